pub mod error;
pub mod model;

pub use error::{AppError, DownloadWarning};
pub use model::{DownloadReport, DownloadRequest, MediaSource, Phase, StreamInfo, StreamKind};
