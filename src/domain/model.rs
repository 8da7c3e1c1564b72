use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use super::error::DownloadWarning;

/// One user-initiated download action, built from the form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub destination_directory: String,
    pub want_audio: bool,
    pub want_video: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub title: String,
    pub streams: Vec<StreamInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub id: String,
    pub url: String,
    /// Container extension as reported by the service (mp4, webm, m4a, ...)
    pub extension: String,
    pub has_audio: bool,
    pub has_video: bool,
    pub height: Option<u32>,
    pub bitrate_kbps: Option<f64>,
    /// Request headers the service requires when fetching `url`
    pub http_headers: HashMap<String, String>,
}

impl StreamInfo {
    pub fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }

    /// Audio and video already muxed into a single file
    pub fn is_progressive(&self) -> bool {
        self.has_audio && self.has_video
    }
}

impl MediaSource {
    /// Audio-only stream with the highest known bitrate.
    ///
    /// Streams without a bitrate rank below those with one. Among equals the
    /// earliest listed stream wins, so with no bitrates at all this is simply
    /// the first audio-only stream.
    pub fn best_audio_stream(&self) -> Option<&StreamInfo> {
        first_max_by(
            self.streams.iter().filter(|s| s.is_audio_only()),
            |a, b| match (a.bitrate_kbps, b.bitrate_kbps) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            },
        )
    }

    /// Highest-resolution progressive MP4 stream
    pub fn best_progressive_mp4(&self) -> Option<&StreamInfo> {
        first_max_by(
            self.streams
                .iter()
                .filter(|s| s.is_progressive() && s.extension.eq_ignore_ascii_case("mp4")),
            |a, b| a.height.unwrap_or(0).cmp(&b.height.unwrap_or(0)),
        )
    }
}

// `Iterator::max_by` returns the last of equal elements; selection wants the first.
fn first_max_by<'a, I, F>(iter: I, mut compare: F) -> Option<&'a StreamInfo>
where
    I: Iterator<Item = &'a StreamInfo>,
    F: FnMut(&StreamInfo, &StreamInfo) -> Ordering,
{
    iter.fold(None, |best, candidate| match best {
        Some(current) if compare(candidate, current) != Ordering::Greater => Some(current),
        _ => Some(candidate),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Video,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Audio => write!(f, "audio-only"),
            StreamKind::Video => write!(f, "progressive MP4"),
        }
    }
}

/// Step of a download action, used to tag failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AudioDownload,
    Transcoding,
    VideoDownload,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::AudioDownload => "downloading audio",
            Phase::Transcoding => "converting to MP3",
            Phase::VideoDownload => "downloading video",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadReport {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<DownloadWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, ext: &str, audio: bool, video: bool) -> StreamInfo {
        StreamInfo {
            id: id.to_string(),
            url: format!("https://media.example/{}", id),
            extension: ext.to_string(),
            has_audio: audio,
            has_video: video,
            height: None,
            bitrate_kbps: None,
            http_headers: HashMap::new(),
        }
    }

    #[test]
    fn test_best_audio_prefers_bitrate() {
        let mut low = stream("139", "m4a", true, false);
        low.bitrate_kbps = Some(48.0);
        let mut high = stream("251", "webm", true, false);
        high.bitrate_kbps = Some(160.0);
        let unknown = stream("140", "m4a", true, false);
        let source = MediaSource {
            title: "t".into(),
            streams: vec![unknown, low, high, stream("18", "mp4", true, true)],
        };
        assert_eq!(source.best_audio_stream().unwrap().id, "251");
    }

    #[test]
    fn test_best_audio_falls_back_to_listing_order() {
        let source = MediaSource {
            title: "t".into(),
            streams: vec![
                stream("18", "mp4", true, true),
                stream("140", "m4a", true, false),
                stream("251", "webm", true, false),
            ],
        };
        assert_eq!(source.best_audio_stream().unwrap().id, "140");
    }

    #[test]
    fn test_best_progressive_mp4() {
        let mut p360 = stream("18", "mp4", true, true);
        p360.height = Some(360);
        let mut p720 = stream("22", "mp4", true, true);
        p720.height = Some(720);
        let mut p720_dup = stream("22b", "mp4", true, true);
        p720_dup.height = Some(720);
        let mut webm = stream("43", "webm", true, true);
        webm.height = Some(1080);
        let mut video_only = stream("137", "mp4", false, true);
        video_only.height = Some(1080);

        let source = MediaSource {
            title: "t".into(),
            streams: vec![p360, webm, video_only, p720, p720_dup],
        };
        assert_eq!(source.best_progressive_mp4().unwrap().id, "22");
    }

    #[test]
    fn test_missing_streams() {
        let source = MediaSource {
            title: "t".into(),
            streams: vec![stream("137", "mp4", false, true)],
        };
        assert!(source.best_audio_stream().is_none());
        assert!(source.best_progressive_mp4().is_none());
    }
}
