//! Content sources: where the bytes of an upload come from.
//!
//! Reading is the only suspension point of the pipeline. A source is read once, fully, into
//! memory; nothing is streamed to the parsers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{Mutex, watch};

use crate::error::{IngestionError, IngestionResult};

/// A one-shot provider of file content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Read the whole content.
    async fn read_all(&self) -> IngestionResult<Vec<u8>>;

    /// Read the whole content and decode it as UTF-8, replacing invalid sequences and
    /// dropping a leading byte-order mark.
    async fn read_text(&self) -> IngestionResult<String> {
        let bytes = self.read_all().await?;
        Ok(decode_text(bytes))
    }
}

/// UTF-8 byte-order mark.
const BOM: char = '\u{feff}';

fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Content already held in memory (e.g. a multipart upload body).
#[derive(Debug, Clone)]
pub struct InMemorySource {
    bytes: Vec<u8>,
}

impl InMemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }
}

impl From<&str> for InMemorySource {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<String> for InMemorySource {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn read_all(&self) -> IngestionResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Content read from the local filesystem.
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentSource for PathSource {
    async fn read_all(&self) -> IngestionResult<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Content pulled from any async reader. The reader is consumed by the first read; later
/// reads return whatever is left (usually nothing).
pub struct ReaderSource<R> {
    reader: Mutex<R>,
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

#[async_trait]
impl<R> ContentSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read_all(&self) -> IngestionResult<Vec<u8>> {
        let mut reader = self.reader.lock().await;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}

/// Cooperative cancellation for in-flight reads.
///
/// Clones share state: cancelling any clone cancels all of them.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: watch::Sender<bool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self { sender }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once [`Self::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.sender.subscribe();
        // The sender lives in `self`, so `wait_for` cannot observe a closed channel here.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Read `source` as text, aborting with [`IngestionError::Cancelled`] if `token` fires first.
pub async fn read_text_cancellable(
    source: &dyn ContentSource,
    token: Option<&CancellationToken>,
) -> IngestionResult<String> {
    let Some(token) = token else {
        return source.read_text().await;
    };
    if token.is_cancelled() {
        return Err(IngestionError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(IngestionError::Cancelled),
        res = source.read_text() => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_source_round_trips_text() {
        let src = InMemorySource::from("a,b\n1,2");
        assert_eq!(src.read_text().await.unwrap(), "a,b\n1,2");
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let src = InMemorySource::new(vec![b'A', 0xFF, b'C']);
        assert_eq!(src.read_text().await.unwrap(), "A\u{FFFD}C");
    }

    #[tokio::test]
    async fn leading_byte_order_mark_is_dropped() {
        let src = InMemorySource::new(b"\xEF\xBB\xBFid,name".to_vec());
        assert_eq!(src.read_text().await.unwrap(), "id,name");

        // Only a leading mark is dropped.
        let src = InMemorySource::new("a\u{feff}b");
        assert_eq!(src.read_text().await.unwrap(), "a\u{feff}b");
    }

    #[tokio::test]
    async fn missing_path_is_an_io_error() {
        let src = PathSource::new("definitely/not/here.csv");
        let err = src.read_all().await.unwrap_err();
        assert!(matches!(err, IngestionError::Io(_)));
    }

    #[tokio::test]
    async fn reader_source_reads_to_end() {
        let src = ReaderSource::new(&b">a\nAC"[..]);
        assert_eq!(src.read_text().await.unwrap(), ">a\nAC");
    }

    #[tokio::test]
    async fn cancelled_token_aborts_read() {
        let token = CancellationToken::new();
        token.cancel();
        let src = InMemorySource::from("x");
        let err = read_text_cancellable(&src, Some(&token)).await.unwrap_err();
        assert!(matches!(err, IngestionError::Cancelled));
    }

    #[tokio::test]
    async fn pending_read_is_interrupted_by_cancel() {
        let (client, _server) = tokio::io::duplex(64);
        let src = ReaderSource::new(client);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let err = read_text_cancellable(&src, Some(&token)).await.unwrap_err();
        assert!(matches!(err, IngestionError::Cancelled));
    }
}
