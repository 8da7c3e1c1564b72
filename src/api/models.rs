use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{MediaSource, StreamInfo};

/// Subset of the `--dump-single-json` output of yt-dlp
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub formats: Vec<FormatInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormatInfo {
    pub format_id: String,
    #[serde(default)]
    pub url: Option<String>,
    pub ext: String,
    #[serde(default)]
    pub protocol: Option<String>,
    /// "none" when the format carries no video
    #[serde(default)]
    pub vcodec: Option<String>,
    /// "none" when the format carries no audio
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default)]
    pub tbr: Option<f64>,
    /// Headers yt-dlp expects on the request for `url`
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
}

fn has_codec(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if c != "none")
}

impl FormatInfo {
    /// Only formats served as one plain HTTP resource can be fetched directly
    fn is_direct(&self) -> bool {
        match self.protocol.as_deref() {
            Some(p) => p == "http" || p == "https",
            None => self.url.as_deref().is_some_and(|u| u.starts_with("http")),
        }
    }

    fn into_stream(self) -> Option<StreamInfo> {
        if !self.is_direct() {
            return None;
        }
        let has_audio = has_codec(self.acodec.as_deref());
        let has_video = has_codec(self.vcodec.as_deref());
        Some(StreamInfo {
            id: self.format_id,
            url: self.url?,
            extension: self.ext,
            has_audio,
            has_video,
            height: if has_video { self.height } else { None },
            bitrate_kbps: self.abr.or(self.tbr),
            http_headers: self.http_headers,
        })
    }
}

impl From<VideoInfo> for MediaSource {
    fn from(info: VideoInfo) -> Self {
        MediaSource {
            title: info.title,
            streams: info
                .formats
                .into_iter()
                .filter_map(FormatInfo::into_stream)
                .collect(),
        }
    }
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub ytdlp_path: String,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            user_agent: concat!("simple-media-downloader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Never Gonna Give You Up",
        "formats": [
            {"format_id": "sb0", "ext": "mhtml", "protocol": "mhtml", "url": "https://i.ytimg.com/sb", "vcodec": "none", "acodec": "none"},
            {"format_id": "140", "ext": "m4a", "protocol": "https", "url": "https://rr1.example/140", "vcodec": "none", "acodec": "mp4a.40.2", "abr": 129.5, "http_headers": {"User-Agent": "Mozilla/5.0 (X11; Linux x86_64)", "Accept": "*/*"}},
            {"format_id": "18", "ext": "mp4", "protocol": "https", "url": "https://rr1.example/18", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "height": 360, "tbr": 500.1},
            {"format_id": "95", "ext": "mp4", "protocol": "m3u8_native", "url": "https://manifest.example/95", "vcodec": "avc1.4d401f", "acodec": "mp4a.40.2", "height": 720}
        ]
    }"#;

    #[test]
    fn test_parse_video_info() {
        let info: VideoInfo = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(info.formats.len(), 4);

        let source = MediaSource::from(info);
        assert_eq!(source.title, "Never Gonna Give You Up");
        let ids: Vec<_> = source.streams.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["140", "18"]);

        let audio = &source.streams[0];
        assert!(audio.is_audio_only());
        assert_eq!(audio.bitrate_kbps, Some(129.5));
        assert_eq!(audio.height, None);
        assert_eq!(
            audio.http_headers.get("User-Agent").map(String::as_str),
            Some("Mozilla/5.0 (X11; Linux x86_64)")
        );
        assert_eq!(audio.http_headers.len(), 2);

        let video = &source.streams[1];
        assert!(video.is_progressive());
        assert_eq!(video.height, Some(360));
        assert!(video.http_headers.is_empty());
    }

    #[test]
    fn test_missing_formats_is_empty() {
        let info: VideoInfo = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(MediaSource::from(info).streams.is_empty());
    }
}
