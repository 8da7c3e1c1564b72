use crate::application::DownloadCoordinator;
use crate::api::{ApiClient, FfmpegTranscoder};
use crate::config::Settings;
use crate::domain::{AppError, DownloadReport};
use crate::ui::{DownloadMessage, DownloadView};
use iced::task::Handle;
use iced::Task;
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};
use std::path::PathBuf;
use tracing::{debug, error, info};

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
    // Abort handle of the running download, if any
    running: Option<Handle>,
}

impl DownloadApp {
    pub fn new(settings: Settings) -> Self {
        let api_client = ApiClient::new(settings.api_config());
        let transcoder = FfmpegTranscoder::new(&settings.ffmpeg_path, &settings.mp3_bitrate);

        let mut view = DownloadView::default();
        if let Some(folder) = &settings.default_folder {
            view.folder = folder.display().to_string();
        }

        Self {
            view,
            coordinator: DownloadCoordinator::new(api_client, transcoder),
            running: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Directory picked in the native dialog, `None` if cancelled
    FolderSelected(Option<PathBuf>),
    /// Final result of one download action
    DownloadFinished(Result<DownloadReport, AppError>),
    NotificationClosed,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::ChooseFolderPressed => {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .pick_folder()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::FolderSelected,
                    );
                }
                DownloadMessage::DownloadPressed if !app.view.is_downloading => {
                    let request = app.view.request();
                    let coordinator = app.coordinator.clone();

                    app.view.is_downloading = true;
                    app.view.status_message = "Downloading...".to_string();

                    // Runs on the tokio executor so the window keeps rendering
                    let (task, handle) = Task::perform(
                        async move { coordinator.download_media(request).await },
                        Message::DownloadFinished,
                    )
                    .abortable();
                    app.running = Some(handle);
                    return task;
                }
                DownloadMessage::CancelPressed => {
                    if let Some(handle) = app.running.take() {
                        handle.abort();
                        info!("download cancelled by user");
                    }
                    app.view.is_downloading = false;
                    app.view.status_message = "Download cancelled".to_string();
                }
                _ => {}
            }
        }
        Message::FolderSelected(Some(path)) => {
            app.view.folder = path.display().to_string();
        }
        Message::FolderSelected(None) => {
            debug!("folder selection cancelled");
        }
        Message::DownloadFinished(result) => {
            app.running = None;
            app.view.is_downloading = false;

            return match result {
                Ok(report) => {
                    app.view.status_message = match report.files.len() {
                        0 => "Done, nothing was saved".to_string(),
                        n => format!("Saved {} file(s)", n),
                    };
                    notify(MessageLevel::Info, "Success", success_text(&report))
                }
                Err(e) => {
                    if e.is_precondition() {
                        debug!(error = %e, "download rejected");
                    } else {
                        error!(error = %e, "download failed");
                    }
                    app.view.status_message = e.to_string();
                    notify(MessageLevel::Error, "Error", e.to_string())
                }
            };
        }
        Message::NotificationClosed => {}
    }
    Task::none()
}

fn success_text(report: &DownloadReport) -> String {
    let mut text = "Download completed successfully!".to_string();
    for warning in &report.warnings {
        text.push_str("\n\n");
        text.push_str(&warning.to_string());
    }
    text
}

/// Modal dialog reporting the end of an action
fn notify(level: MessageLevel, title: &'static str, description: String) -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::NotificationClosed,
    )
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
