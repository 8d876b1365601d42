// Extractors - concrete video sources
//
// The yt-dlp source resolves metadata through the `yt-dlp` binary and
// streams the chosen rendition over HTTP. Diagnostics turn the free-form
// errors it reports into actionable hints.

mod config;
mod diagnostics;
mod ytdlp;

pub use config::ExtractorConfig;
pub use diagnostics::{diagnose_error, BlockingReason};
pub use ytdlp::YtDlpSource;
