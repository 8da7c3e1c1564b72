use iced::{
    widget::{button, column, row, text, text_input, toggler, Space},
    Element, Length,
};

use crate::domain::DownloadRequest;

/// Main view state
pub struct DownloadView {
    pub youtube_url: String,
    pub folder: String,
    pub want_audio: bool,
    pub want_video: bool,
    pub status_message: String,
    pub is_downloading: bool,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            youtube_url: String::new(),
            folder: String::new(),
            want_audio: false,
            want_video: false,
            status_message: "Paste a YouTube URL to get started".to_string(),
            is_downloading: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    FolderChanged(String),
    Mp3Toggled(bool),
    Mp4Toggled(bool),
    ChooseFolderPressed,
    DownloadPressed,
    CancelPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.youtube_url = url;
            }
            DownloadMessage::FolderChanged(folder) => {
                self.folder = folder;
            }
            DownloadMessage::Mp3Toggled(on) => {
                self.want_audio = on;
            }
            DownloadMessage::Mp4Toggled(on) => {
                self.want_video = on;
            }
            DownloadMessage::ChooseFolderPressed
            | DownloadMessage::DownloadPressed
            | DownloadMessage::CancelPressed => {
                // Will be handled by the app
            }
        }
    }

    /// Snapshot of the form for one download action
    pub fn request(&self) -> DownloadRequest {
        DownloadRequest {
            url: self.youtube_url.trim().to_string(),
            destination_directory: self.folder.clone(),
            want_audio: self.want_audio,
            want_video: self.want_video,
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let idle = !self.is_downloading;

        let download = button("Download")
            .on_press_maybe(idle.then_some(DownloadMessage::DownloadPressed))
            .padding([10, 20]);
        let cancel = button("Cancel")
            .on_press_maybe(self.is_downloading.then_some(DownloadMessage::CancelPressed))
            .padding([10, 20]);

        column![
            text("YouTube Video Downloader").size(28),
            Space::new().height(Length::Fixed(10.0)),
            text("YouTube URL:").size(16),
            text_input("https://www.youtube.com/watch?v=...", &self.youtube_url)
                .on_input(DownloadMessage::UrlChanged)
                .padding(10),
            toggler(self.want_video)
                .label("Download as MP4 (Video + Audio)")
                .on_toggle(DownloadMessage::Mp4Toggled),
            toggler(self.want_audio)
                .label("Download as MP3 (Audio Only)")
                .on_toggle(DownloadMessage::Mp3Toggled),
            Space::new().height(Length::Fixed(10.0)),
            button("Choose Save Folder")
                .on_press_maybe(idle.then_some(DownloadMessage::ChooseFolderPressed))
                .padding([8, 16]),
            text_input("Save folder...", &self.folder)
                .on_input(DownloadMessage::FolderChanged)
                .padding(10),
            Space::new().height(Length::Fixed(20.0)),
            row![download, cancel].spacing(10),
            text(&self.status_message).size(14),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
