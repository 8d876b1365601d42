// Transfer engine - copies a media stream into a local file

use std::io::Write;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use super::errors::{AppError, AppResult};
use super::models::TransferProgress;
use super::progress::ProgressReporter;

/// Bytes requested from the source per read
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

pub struct TransferEngine {
    chunk_size: usize,
}

impl TransferEngine {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Copy `source` into a fresh file at `destination`, reporting after each chunk.
    ///
    /// A partial file stays on disk when the copy fails; the handle is closed
    /// on every return path.
    pub async fn copy<R, W>(
        &self,
        source: &mut R,
        destination: &Path,
        declared_length: u64,
        reporter: &mut ProgressReporter<W>,
    ) -> AppResult<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
        W: Write,
    {
        let mut file = File::create(destination)
            .await
            .map_err(AppError::CreateFile)?;
        debug!(path = %destination.display(), "created output file");

        let mut buf = vec![0u8; self.chunk_size];
        let mut progress = TransferProgress::new(declared_length);
        reporter.begin(declared_length)?;

        loop {
            let n = match source.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    // what already arrived stays on disk
                    file.flush().await.map_err(AppError::WriteFile)?;
                    return Err(AppError::ReadStream(e));
                }
            };
            if n == 0 {
                break;
            }

            file.write_all(&buf[..n])
                .await
                .map_err(AppError::WriteFile)?;
            progress.advance(n);
            reporter.report(&progress)?;
        }

        file.flush().await.map_err(AppError::WriteFile)?;
        reporter.finish()?;

        info!(bytes = progress.bytes_written, path = %destination.display(), "transfer finished");
        Ok(progress.bytes_written)
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Serves a few bytes, then fails
    struct BrokenStream {
        served: bool,
    }

    impl AsyncRead for BrokenStream {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.served {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")));
            }
            self.served = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_copy_whole_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let data = vec![7u8; 65_536];
        let mut source: &[u8] = &data;
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(&mut out);

        let written = TransferEngine::default()
            .copy(&mut source, &path, 65_536, &mut reporter)
            .await
            .unwrap();

        assert_eq!(written, 65_536);
        assert_eq!(std::fs::read(&path).unwrap(), data);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("50.00%"));
        assert!(text.contains("100.00%"));
    }

    #[tokio::test]
    async fn test_empty_stream_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp4");
        let mut source: &[u8] = &[];
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(&mut out);

        let written = TransferEngine::default()
            .copy(&mut source, &path, 0, &mut reporter)
            .await
            .unwrap();

        assert_eq!(written, 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Unknown video size").count(), 1);
        assert!(!text.contains('\r'));
    }

    #[tokio::test]
    async fn test_unknown_length_reports_megabytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.mp4");
        let data = vec![3u8; 3 * 1024 * 1024];
        let mut source: &[u8] = &data;
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(&mut out);

        TransferEngine::new(1024 * 1024)
            .copy(&mut source, &path, 0, &mut reporter)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Unknown video size").count(), 1);
        let updates: Vec<&str> = text.split('\r').skip(1).collect();
        assert_eq!(updates.len(), 3);
        assert!(updates[0].contains("1.00 MB complete"));
        assert!(updates[2].contains("3.00 MB complete"));
        assert!(!text.contains('%'));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), data.len() as u64);
    }

    #[tokio::test]
    async fn test_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.mp4");
        std::fs::write(&path, vec![1u8; 1000]).unwrap();
        let mut source: &[u8] = b"new";
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(&mut out);

        TransferEngine::new(2)
            .copy(&mut source, &path, 3, &mut reporter)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_read_error_keeps_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mp4");
        let mut source = BrokenStream { served: false };
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(&mut out);

        let err = TransferEngine::default()
            .copy(&mut source, &path, 100, &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReadStream(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"partial");
    }

    #[tokio::test]
    async fn test_create_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.mp4");
        let mut source: &[u8] = b"data";
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(&mut out).with_title("Clip");

        let err = TransferEngine::default()
            .copy(&mut source, &path, 4, &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CreateFile(_)));
        assert!(out.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_full_disk_is_write_failure() {
        let mut source: &[u8] = b"data";
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(&mut out);

        let err = TransferEngine::default()
            .copy(&mut source, Path::new("/dev/full"), 4, &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::WriteFile(_)));
        assert_eq!(err.kind(), crate::downloader::ErrorKind::Filesystem);
    }
}
