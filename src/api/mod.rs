pub mod client;
pub mod models;
pub mod transcoder;

pub use client::{ApiClient, ApiError, Result};
pub use models::ApiConfig;
pub use transcoder::FfmpegTranscoder;
