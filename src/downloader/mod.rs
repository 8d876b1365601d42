// Downloader module - fetch, choose, and copy one rendition

pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod progress;
pub mod traits;
pub mod transfer;
pub mod utils;

pub use errors::{AppError, AppResult, ErrorKind, ExtractorError};
pub use format_selector::FormatSelector;
pub use models::{Rendition, StreamLocator, TransferProgress, VideoMetadata};
pub use progress::ProgressReporter;
pub use traits::{ByteStream, VideoSource};
pub use transfer::TransferEngine;
