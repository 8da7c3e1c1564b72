use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::client::{spawn_error, stderr_reason, ApiError, Result};

/// Re-encodes downloaded audio to MP3 with an external ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
    bitrate: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>, bitrate: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            bitrate: bitrate.into(),
        }
    }

    pub async fn to_mp3(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(input = %input.display(), output = %output.display(), "transcoding to mp3");

        let result = Command::new(&self.ffmpeg_path)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-vn", "-codec:a", "libmp3lame", "-b:a", self.bitrate.as_str()])
            .arg(output)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(&self.ffmpeg_path, e))?;

        if !result.status.success() {
            return Err(ApiError::Transcode(stderr_reason(&result.stderr)));
        }
        Ok(())
    }
}
