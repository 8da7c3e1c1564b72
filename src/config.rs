use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// User settings read from `config.toml` in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ytdlp_path: String,
    pub ffmpeg_path: String,
    /// Passed to ffmpeg as `-b:a`
    pub mp3_bitrate: String,
    pub user_agent: String,
    /// Pre-fills the destination folder field
    pub default_folder: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            ytdlp_path: api.ytdlp_path,
            ffmpeg_path: "ffmpeg".to_string(),
            mp3_bitrate: "192k".to_string(),
            user_agent: api.user_agent,
            default_folder: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "simple-media-downloader")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load settings from the default location; a missing file yields defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            ytdlp_path: self.ytdlp_path.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "ytdlp_path = \"/opt/bin/yt-dlp\"\ndefault_folder = \"/home/me/Music\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.ytdlp_path, "/opt/bin/yt-dlp");
        assert_eq!(settings.default_folder, Some(PathBuf::from("/home/me/Music")));
        assert_eq!(settings.mp3_bitrate, "192k");
        assert_eq!(settings.api_config().ytdlp_path, "/opt/bin/yt-dlp");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mp3_bitrate = 192").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
