use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::models::{ApiConfig, VideoInfo};
use crate::domain::{MediaSource, StreamInfo};
use crate::utils::{output_file_name, PendingFile};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("{0} was not found; is it installed and on PATH?")]
    ToolNotFound(String),

    #[error("{0}")]
    Extractor(String),

    #[error("Conversion failed: {0}")]
    Transcode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Map a spawn failure, telling a missing executable apart from other I/O errors
pub(crate) fn spawn_error(program: &str, err: std::io::Error) -> ApiError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ApiError::ToolNotFound(program.to_string())
    } else {
        ApiError::Io(err)
    }
}

/// Last non-empty line of a child's stderr, which is where yt-dlp and ffmpeg put the reason
pub(crate) fn stderr_reason(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("process exited with an error")
        .to_string()
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .unwrap_or_else(|e| {
                warn!(user_agent = %config.user_agent, error = %e, "invalid HTTP client settings, using defaults");
                Client::new()
            });
        Self { config, http }
    }

    /// Step 1: Ask yt-dlp for the video metadata and its stream list
    pub async fn fetch_info(&self, url: &str) -> Result<MediaSource> {
        let program = &self.config.ytdlp_path;
        debug!(%program, %url, "querying video info");

        let output = Command::new(program)
            .args(["--dump-single-json", "--no-playlist", "--no-warnings"])
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(program, e))?;

        if !output.status.success() {
            return Err(ApiError::Extractor(stderr_reason(&output.stderr)));
        }

        let info: VideoInfo = serde_json::from_slice(&output.stdout)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;
        debug!(id = %info.id, formats = info.formats.len(), "video info received");

        Ok(info.into())
    }

    /// Step 2: Open the stream body, sending the headers the service asked for
    pub async fn download_file_stream(
        &self,
        download_url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<impl Stream<Item = Result<bytes::Bytes>>> {
        let parsed = url::Url::parse(download_url)
            .map_err(|e| ApiError::InvalidResponse(format!("Bad stream URL: {}", e)))?;

        let response = self
            .http
            .get(parsed)
            .headers(header_map(headers)?)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Download request failed: {}", e)))?;

        Ok(response.bytes_stream().map_err(ApiError::RequestError))
    }

    /// Step 3: Save a stream as `<title>.<ext>` inside `dir`.
    ///
    /// An existing file with the same name is overwritten. The file is
    /// removed again unless the whole body was written, including when the
    /// returned future is dropped mid-transfer.
    pub async fn download_stream(
        &self,
        stream: &StreamInfo,
        title: &str,
        dir: &Path,
    ) -> Result<PathBuf> {
        let path = dir.join(output_file_name(title, &stream.extension));
        debug!(format = %stream.id, path = %path.display(), "downloading stream");

        let body = self
            .download_file_stream(&stream.url, &stream.http_headers)
            .await?;
        let file = tokio::fs::File::create(&path).await?;
        let pending = PendingFile::new(path);

        // The handle moves into write_body so it is closed before the guard deletes the file
        write_body(file, body).await?;

        Ok(pending.keep())
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidResponse(format!("Bad header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidResponse(format!("Bad value for header {}: {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

async fn write_body(
    mut file: tokio::fs::File,
    body: impl Stream<Item = Result<bytes::Bytes>>,
) -> Result<()> {
    let mut body = std::pin::pin!(body);
    while let Some(chunk) = body.next().await {
        file.write_all(&chunk?).await?;
    }
    // Flush remaining data to disk
    file.sync_all().await?;
    Ok(())
}
