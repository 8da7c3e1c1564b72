pub mod download_coordinator;
pub mod services;

pub use download_coordinator::DownloadCoordinator;
pub use services::{MediaService, Transcoder};
