// Video source trait definition

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::errors::ExtractorError;
use super::models::{Rendition, VideoMetadata};

/// Sequential, forward-only stream of media bytes
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Capability to resolve videos and open their media streams
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Name of the source (for logging)
    fn name(&self) -> &'static str;

    /// Resolve a URL to its metadata and rendition list
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ExtractorError>;

    /// Open the byte stream for one rendition of a fetched video
    async fn open_stream(
        &self,
        video: &VideoMetadata,
        rendition: &Rendition,
    ) -> Result<ByteStream, ExtractorError>;
}
