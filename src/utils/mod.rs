use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::warn;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(https?://)?(www\.)?",
        r"(youtube|youtu|youtube-nocookie)\.(com|be)/",
        r"(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})",
    ))
    .expect("YouTube URL pattern is valid")
});

/// Check whether `url` looks like a YouTube video link.
///
/// Only the start of the string is anchored, so anything after a valid
/// prefix is accepted. The fetch service remains the authority on whether
/// the video actually exists.
pub fn is_valid_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url)
}

/// Extract the 11-character video id from a YouTube link
pub fn extract_video_id(url: &str) -> Option<String> {
    YOUTUBE_URL
        .captures(url)
        .and_then(|caps| caps.get(6))
        .map(|m| m.as_str().to_string())
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build `<title>.<extension>` from a media title
pub fn output_file_name(title: &str, extension: &str) -> String {
    let sanitized = sanitize_filename(title);
    let stem = sanitized.trim_matches(|c| c == '.' || c == ' ');
    let stem = if stem.is_empty() { "download" } else { stem };
    format!("{}.{}", stem, extension)
}

/// A file that is still being produced; deleted on drop unless kept or removed.
///
/// Dropping an in-flight download or conversion future drops this guard, so
/// cancelled work never leaves a truncated file behind.
pub struct PendingFile {
    path: PathBuf,
    settled: bool,
}

impl PendingFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            settled: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file is complete; hand back its path and stop guarding it
    pub fn keep(mut self) -> PathBuf {
        self.settled = true;
        std::mem::take(&mut self.path)
    }

    pub fn remove(mut self) -> std::io::Result<()> {
        self.settled = true;
        std::fs::remove_file(&self.path)
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "could not remove unfinished file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_url("http://youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_url("youtu.be/dQw4w9WgXcQ"));
        assert!(is_valid_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_valid_url("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert!(is_valid_url("https://www.youtube.com/v/dQw4w9WgXcQ"));
        assert!(is_valid_url(
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"
        ));
        assert!(is_valid_url(
            "https://www.youtube.com/playlist?list=x&foo?v=dQw4w9WgXcQ"
        ));
    }

    #[test]
    fn test_trailing_input_is_accepted() {
        assert!(is_valid_url(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"
        ));
        assert!(is_valid_url("youtu.be/dQw4w9WgXcQ garbage"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("https://vimeo.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_valid_url("https://www.youtube.org/watch?v=dQw4w9WgXcQ"));
        assert!(!is_valid_url("https://www.youtube.com/watch?v=short"));
        assert!(!is_valid_url("https://www.youtube.com/watch?v=dQw4w%9WgXc"));
        assert!(!is_valid_url("see https://youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("https://example.com"), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test/file.mp3"), "test_file.mp3");
        assert_eq!(sanitize_filename("normal-name.mp3"), "normal-name.mp3");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("A: B?", "mp4"), "A_ B_.mp4");
        assert_eq!(output_file_name(" ..title.. ", "m4a"), "title.m4a");
        assert_eq!(output_file_name("...", "webm"), "download.webm");
    }

    #[test]
    fn test_pending_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.mp4");
        std::fs::write(&path, "half").unwrap();

        drop(PendingFile::new(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn test_pending_file_keep() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.mp4");
        std::fs::write(&path, "whole").unwrap();

        let kept = PendingFile::new(path.clone()).keep();
        assert_eq!(kept, path);
        assert!(path.exists());
    }

    #[test]
    fn test_pending_file_remove_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let guard = PendingFile::new(dir.path().join("never-written.m4a"));
        assert!(guard.remove().is_err());
    }
}
