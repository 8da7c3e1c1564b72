use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::api::{ApiClient, FfmpegTranscoder, Result};
use crate::domain::{MediaSource, StreamInfo};

/// Source of video metadata and stream bytes
#[async_trait]
pub trait MediaService: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<MediaSource>;

    /// Save `stream` into `dir` and return the written path
    async fn download(&self, stream: &StreamInfo, title: &str, dir: &Path) -> Result<PathBuf>;
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<()>;
}

#[async_trait]
impl MediaService for ApiClient {
    async fn fetch(&self, url: &str) -> Result<MediaSource> {
        self.fetch_info(url).await
    }

    async fn download(&self, stream: &StreamInfo, title: &str, dir: &Path) -> Result<PathBuf> {
        self.download_stream(stream, title, dir).await
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<()> {
        FfmpegTranscoder::to_mp3(self, input, output).await
    }
}
