// Common data models for downloader

use std::collections::HashMap;

/// Video information resolved from a URL
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub renditions: Vec<Rendition>,
}

/// Where the bytes of a rendition live; only the source that produced it interprets it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamLocator {
    /// Format ID (e.g., "137", "140")
    pub format_id: String,
    /// Direct media URL
    pub url: String,
    /// Request headers the media server expects
    pub http_headers: HashMap<String, String>,
}

/// One encoded variant of a video
#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    /// Resolution marker such as "720p"; empty means not selectable
    pub quality_label: String,
    pub audio_channels: u32,
    /// Declared size in bytes, 0 when the service did not report one
    pub content_length: u64,
    pub locator: StreamLocator,
}

impl Rendition {
    pub fn new(quality_label: impl Into<String>, audio_channels: u32, content_length: u64) -> Self {
        Self {
            quality_label: quality_label.into(),
            audio_channels,
            content_length,
            locator: StreamLocator::default(),
        }
    }

    pub fn with_locator(mut self, locator: StreamLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn has_audio(&self) -> bool {
        self.audio_channels > 0
    }

    pub fn is_selectable(&self) -> bool {
        !self.quality_label.is_empty()
    }
}

/// Byte counter for a single download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_written: u64,
    pub declared_length: u64,
}

impl TransferProgress {
    pub fn new(declared_length: u64) -> Self {
        Self {
            bytes_written: 0,
            declared_length,
        }
    }

    pub fn advance(&mut self, n: usize) {
        self.bytes_written += n as u64;
    }

    pub fn is_size_known(&self) -> bool {
        self.declared_length > 0
    }
}
