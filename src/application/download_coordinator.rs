use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{MediaService, Transcoder};
use crate::{
    api::{ApiClient, ApiError, FfmpegTranscoder},
    domain::{
        AppError, DownloadReport, DownloadRequest, DownloadWarning, MediaSource, Phase, StreamKind,
    },
    utils::{extract_video_id, is_valid_url, PendingFile},
};

/// Runs one download action: validate, fetch, then the audio and video branches in order.
///
/// Holds no state between calls; every request fetches its media info fresh.
pub struct DownloadCoordinator<M = ApiClient, T = FfmpegTranscoder> {
    media: Arc<M>,
    transcoder: Arc<T>,
}

impl<M, T> Clone for DownloadCoordinator<M, T> {
    fn clone(&self) -> Self {
        Self {
            media: Arc::clone(&self.media),
            transcoder: Arc::clone(&self.transcoder),
        }
    }
}

fn failed(phase: Phase, err: ApiError) -> AppError {
    AppError::OperationFailed {
        phase,
        message: err.to_string(),
    }
}

impl<M: MediaService, T: Transcoder> DownloadCoordinator<M, T> {
    pub fn new(media: M, transcoder: T) -> Self {
        Self {
            media: Arc::new(media),
            transcoder: Arc::new(transcoder),
        }
    }

    /// Download the requested media into the destination directory.
    ///
    /// The first failure aborts the rest of the action; files finished by an
    /// earlier branch are left in place. Dropping the future cancels the
    /// action; unfinished downloads, the intermediate audio container and a
    /// half-written MP3 are removed.
    pub async fn download_media(&self, request: DownloadRequest) -> Result<DownloadReport, AppError> {
        if request.destination_directory.is_empty() {
            return Err(AppError::MissingDestination);
        }
        if !is_valid_url(&request.url) {
            return Err(AppError::InvalidUrl);
        }

        let mut report = DownloadReport::default();
        if !request.want_audio && !request.want_video {
            info!("neither MP3 nor MP4 selected, nothing to download");
            return Ok(report);
        }

        let video_id = extract_video_id(&request.url).unwrap_or_default();
        info!(
            %video_id,
            audio = request.want_audio,
            video = request.want_video,
            dir = %request.destination_directory,
            "starting download"
        );

        let source = self.media.fetch(&request.url).await.map_err(|e| {
            warn!(%video_id, error = %e, "fetching video info failed");
            AppError::FetchFailed(e.to_string())
        })?;
        debug!(title = %source.title, streams = source.streams.len(), "video info fetched");

        let dir = Path::new(&request.destination_directory);

        if request.want_audio {
            self.download_audio(&source, dir, &mut report).await?;
        }
        if request.want_video {
            self.download_video(&source, dir, &mut report).await?;
        }

        info!(%video_id, files = report.files.len(), warnings = report.warnings.len(), "download finished");
        Ok(report)
    }

    async fn download_audio(
        &self,
        source: &MediaSource,
        dir: &Path,
        report: &mut DownloadReport,
    ) -> Result<(), AppError> {
        let Some(stream) = source.best_audio_stream() else {
            warn!(title = %source.title, "no audio-only stream, skipping MP3");
            report
                .warnings
                .push(DownloadWarning::StreamUnavailable(StreamKind::Audio));
            return Ok(());
        };

        let downloaded = self
            .media
            .download(stream, &source.title, dir)
            .await
            .map_err(|e| failed(Phase::AudioDownload, e))?;
        let container = PendingFile::new(downloaded);

        let mp3_path = container.path().with_extension("mp3");
        if mp3_path == container.path() {
            report.files.push(container.keep());
            return Ok(());
        }

        let mp3 = PendingFile::new(mp3_path);
        self.transcoder
            .to_mp3(container.path(), mp3.path())
            .await
            .map_err(|e| failed(Phase::Transcoding, e))?;
        let mp3_path = mp3.keep();

        let container_path = container.path().to_path_buf();
        if let Err(e) = container.remove() {
            warn!(path = %container_path.display(), error = %e, "could not remove intermediate file");
            report.warnings.push(DownloadWarning::CleanupFailed {
                path: container_path,
                message: e.to_string(),
            });
        }

        info!(path = %mp3_path.display(), "saved MP3");
        report.files.push(mp3_path);
        Ok(())
    }

    async fn download_video(
        &self,
        source: &MediaSource,
        dir: &Path,
        report: &mut DownloadReport,
    ) -> Result<(), AppError> {
        let Some(stream) = source.best_progressive_mp4() else {
            warn!(title = %source.title, "no progressive MP4 stream, skipping MP4");
            report
                .warnings
                .push(DownloadWarning::StreamUnavailable(StreamKind::Video));
            return Ok(());
        };

        let path = self
            .media
            .download(stream, &source.title, dir)
            .await
            .map_err(|e| failed(Phase::VideoDownload, e))?;

        info!(path = %path.display(), height = ?stream.height, "saved MP4");
        report.files.push(path);
        Ok(())
    }
}
