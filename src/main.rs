mod api;
mod app;
mod application;
mod config;
mod domain;
mod logging;
mod ui;
mod utils;

use config::Settings;
use iced::window;
use tracing::{info, warn};

fn main() -> iced::Result {
    logging::init_logging();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default settings");
        Settings::default()
    });
    info!(ytdlp = %settings.ytdlp_path, ffmpeg = %settings.ffmpeg_path, "settings loaded");

    let icon_data = include_bytes!("../assets/icon.png");

    let icon = match image::load_from_memory(icon_data) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            window::icon::from_rgba(rgba.into_raw(), width, height).ok()
        }
        Err(_) => None,
    };

    iced::application(
        move || app::DownloadApp::new(settings.clone()),
        app::update,
        app::view,
    )
    .title("YouTube Video Downloader")
    .window(window::Settings {
        icon,
        size: iced::Size::new(520.0, 520.0),
        resizable: false,
        ..Default::default()
    })
    .run()
}
