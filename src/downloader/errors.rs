// Error types for the download pipeline

use std::io;

use thiserror::Error;

use super::extractors::{diagnose_error, BlockingReason};

/// Failure reported by a video source (yt-dlp, HTTP stream, test fakes)
#[derive(Debug, Clone, Error)]
pub enum ExtractorError {
    /// Network timeout while talking to the service
    #[error("network timeout: {0}")]
    NetworkTimeout(String),

    /// Service refused the request (429, bot detection, etc.)
    #[error("request blocked by the service: {0}")]
    Blocked(String),

    /// yt-dlp binary could not be started
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// URL rejected by the extractor
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse yt-dlp JSON output
    #[error("parse error: {0}")]
    ParseError(String),

    /// Media server answered with a non-success status
    #[error("HTTP status {status} from media server")]
    HttpStatus { status: u16 },

    /// Command or request execution failed
    #[error("execution error: {0}")]
    ExecutionError(String),

    #[error("{0}")]
    Unknown(String),
}

impl ExtractorError {
    /// Known blocking reason behind this error, if the text gives one away
    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        diagnose_error(&self.to_string()).filter(|reason| reason.hint().is_some())
    }
}

// Classify raw stderr text from yt-dlp. ToolNotFound only comes from a failed spawn.
impl From<String> for ExtractorError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("timeout") || lower.contains("timed out") {
            return Self::NetworkTimeout(s);
        }

        if lower.contains("429") || lower.contains("not a bot") || lower.contains("blocked") {
            return Self::Blocked(s);
        }

        if lower.contains("json") || lower.contains("parse") {
            return Self::ParseError(s);
        }

        if lower.contains("invalid url") || lower.contains("unsupported url") || lower.contains("is not a valid url") {
            return Self::InvalidUrl(s);
        }

        Self::Unknown(s)
    }
}

impl From<reqwest::Error> for ExtractorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::NetworkTimeout(e.to_string())
        } else if let Some(status) = e.status() {
            Self::HttpStatus { status: status.as_u16() }
        } else if e.is_builder() {
            Self::InvalidUrl(e.to_string())
        } else {
            Self::ExecutionError(e.to_string())
        }
    }
}

/// Broad error categories, one per failing stage family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserInput,
    Collaborator,
    Filesystem,
    StreamRead,
    Terminal,
}

/// Fatal condition that ends the run
#[derive(Debug, Error)]
pub enum AppError {
    #[error("You must provide a video URL using the -l flag")]
    MissingUrl,

    #[error("Failed to read input: {0}")]
    ReadInput(#[source] io::Error),

    #[error("Invalid choice")]
    InvalidChoice,

    #[error("Failed to get video info: {0}")]
    VideoInfo(#[source] ExtractorError),

    #[error("Failed to get stream: {0}")]
    Stream(#[source] ExtractorError),

    #[error("Failed to create file: {0}")]
    CreateFile(#[source] io::Error),

    #[error("Failed to write to file: {0}")]
    WriteFile(#[source] io::Error),

    #[error("Failed to download video: {0}")]
    ReadStream(#[source] io::Error),

    #[error("Failed to write output: {0}")]
    Terminal(#[source] io::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingUrl | Self::ReadInput(_) | Self::InvalidChoice => ErrorKind::UserInput,
            Self::VideoInfo(_) | Self::Stream(_) => ErrorKind::Collaborator,
            Self::CreateFile(_) | Self::WriteFile(_) => ErrorKind::Filesystem,
            Self::ReadStream(_) => ErrorKind::StreamRead,
            Self::Terminal(_) => ErrorKind::Terminal,
        }
    }

    /// Recognized cause of a collaborator failure
    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        match self {
            Self::VideoInfo(e) | Self::Stream(e) => e.blocking_reason(),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_classification() {
        assert!(matches!(
            ExtractorError::from("ERROR: Read timed out".to_string()),
            ExtractorError::NetworkTimeout(_)
        ));
        assert!(matches!(
            ExtractorError::from("HTTP Error 429: Too Many Requests".to_string()),
            ExtractorError::Blocked(_)
        ));
        assert!(matches!(
            ExtractorError::from("ERROR: Unsupported URL: https://example.com".to_string()),
            ExtractorError::InvalidUrl(_)
        ));
        assert!(matches!(
            ExtractorError::from("something odd".to_string()),
            ExtractorError::Unknown(_)
        ));
    }

    #[test]
    fn test_stage_messages() {
        let err = AppError::VideoInfo(ExtractorError::Unknown("Video unavailable".into()));
        assert_eq!(err.to_string(), "Failed to get video info: Video unavailable");
        assert_eq!(err.kind(), ErrorKind::Collaborator);

        let err = AppError::Stream(ExtractorError::HttpStatus { status: 403 });
        assert_eq!(err.to_string(), "Failed to get stream: HTTP status 403 from media server");

        assert_eq!(AppError::InvalidChoice.kind(), ErrorKind::UserInput);
        assert_eq!(
            AppError::ReadStream(io::Error::new(io::ErrorKind::ConnectionReset, "reset")).kind(),
            ErrorKind::StreamRead
        );
    }

    #[test]
    fn test_hint_from_cause() {
        let err = AppError::VideoInfo(ExtractorError::Unknown(
            "ERROR: Sign in to confirm your age".into(),
        ));
        assert_eq!(err.blocking_reason(), Some(BlockingReason::AgeRestricted));
        assert!(AppError::InvalidChoice.blocking_reason().is_none());
    }

    #[test]
    fn test_http_not_found_is_not_missing_tool() {
        let err = ExtractorError::from(
            "ERROR: [youtube] abc: Unable to download webpage: HTTP Error 404: Not Found".to_string(),
        );

        assert!(matches!(err, ExtractorError::Unknown(_)));
        assert!(!err.to_string().contains("tool not found"));
    }

    #[test]
    fn test_timeout_keeps_cause() {
        let stderr = "ERROR: [youtube] abc: Unable to download API page: <urlopen error timed out>";
        let err = AppError::VideoInfo(ExtractorError::from(stderr.to_string()));

        assert_eq!(
            err.to_string(),
            format!("Failed to get video info: network timeout: {}", stderr)
        );
        assert_eq!(err.blocking_reason(), Some(BlockingReason::NetworkTimeout));
    }
}
