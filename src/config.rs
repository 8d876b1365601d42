// Run configuration

use std::path::PathBuf;

use crate::downloader::extractors::ExtractorConfig;
use crate::downloader::transfer::DEFAULT_CHUNK_SIZE;

/// Everything one download run needs besides the video source
#[derive(Debug, Clone)]
pub struct Config {
    /// Video page URL
    pub url: String,
    /// Directory the output file is written to
    pub output_dir: PathBuf,
    /// Bytes requested from the stream per read
    pub chunk_size: usize,
    pub extractor: ExtractorConfig,
}

impl Config {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: PathBuf::from("."),
            chunk_size: DEFAULT_CHUNK_SIZE,
            extractor: ExtractorConfig::default(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }
}
