//! Concurrent ingestion of many uploads.
//!
//! This module sits "above" [`crate::ingestion`] and provides:
//!
//! - Concurrent validate/read/parse of a batch of uploads, results in input order
//! - A bound on how many content reads are in flight at once
//! - Real-time metrics + observer hooks for monitoring

mod observer;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};

use crate::ingestion::{ContentSource, IngestionReport, Ingestor};
use crate::types::FileDescriptor;

pub use observer::{BatchEvent, BatchMetrics, BatchMetricsSnapshot, BatchObserver, StdErrBatchObserver};

/// Configuration for the [`BatchIngestor`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Upper bound on uploads processed concurrently.
    pub max_in_flight: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self { max_in_flight: n.max(1) }
    }
}

/// One upload to ingest: an optional descriptor plus its content source.
#[derive(Clone)]
pub struct Upload {
    pub descriptor: Option<FileDescriptor>,
    pub source: Arc<dyn ContentSource>,
}

impl Upload {
    pub fn new(descriptor: FileDescriptor, source: Arc<dyn ContentSource>) -> Self {
        Self {
            descriptor: Some(descriptor),
            source,
        }
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Ingests batches of uploads with bounded concurrency.
pub struct BatchIngestor {
    ingestor: Ingestor,
    opts: BatchOptions,
    observer: Option<Arc<dyn BatchObserver>>,
    metrics: Arc<BatchMetrics>,
}

impl BatchIngestor {
    /// Create a new batch ingestor.
    ///
    /// # Panics
    ///
    /// Panics if `max_in_flight == 0`.
    pub fn new(ingestor: Ingestor, opts: BatchOptions) -> Self {
        assert!(opts.max_in_flight > 0, "max_in_flight must be > 0");
        Self {
            ingestor,
            opts,
            observer: None,
            metrics: Arc::new(BatchMetrics::new()),
        }
    }

    /// Attach an observer for batch events.
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time batch metrics.
    pub fn metrics(&self) -> Arc<BatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Ingest every upload; reports come back in input order.
    pub async fn run(&self, uploads: &[Upload]) -> Vec<IngestionReport> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(BatchEvent::RunStarted { uploads: uploads.len() });

        let reports = stream::iter(uploads.iter().enumerate())
            .map(|(index, upload)| self.run_one(index, upload))
            .buffered(self.opts.max_in_flight)
            .collect::<Vec<_>>()
            .await;

        self.metrics.end_run(start.elapsed());
        self.emit(BatchEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        tracing::debug!(metrics = %self.metrics.snapshot(), "batch finished");

        reports
    }

    async fn run_one(&self, index: usize, upload: &Upload) -> IngestionReport {
        self.metrics.on_upload_start();
        self.emit(BatchEvent::UploadStarted {
            index,
            file_name: upload.descriptor.as_ref().map(|d| d.name.clone()),
        });

        let report = self
            .ingestor
            .ingest(upload.descriptor.as_ref(), upload.source.as_ref())
            .await;

        self.metrics.on_upload_end(&report);
        self.emit(BatchEvent::UploadFinished {
            index,
            accepted: report.rejection().is_none(),
            parsed: report.is_success(),
        });
        report
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchIngestor, BatchOptions, Upload};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::IngestionResult;
    use crate::ingestion::{ContentSource, InMemorySource, IngestionReport, Ingestor};
    use crate::types::FileDescriptor;

    struct SlowSource {
        active: Arc<AtomicUsize>,
        max_active: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ContentSource for SlowSource {
        async fn read_all(&self) -> IngestionResult<Vec<u8>> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(b"hello".to_vec())
        }
    }

    fn slow_uploads(n: usize, max_active: &Arc<AtomicUsize>) -> Vec<Upload> {
        let active = Arc::new(AtomicUsize::new(0));
        (0..n)
            .map(|i| {
                let source: Arc<dyn ContentSource> = Arc::new(SlowSource {
                    active: Arc::clone(&active),
                    max_active: Arc::clone(max_active),
                });
                Upload::new(FileDescriptor::new(format!("f{i}.txt"), 5, "text/plain"), source)
            })
            .collect()
    }

    #[tokio::test]
    async fn runs_uploads_concurrently() {
        let max_active = Arc::new(AtomicUsize::new(0));
        let uploads = slow_uploads(8, &max_active);
        let batch = BatchIngestor::new(Ingestor::default(), BatchOptions { max_in_flight: 4 });

        let reports = batch.run(&uploads).await;
        assert_eq!(reports.len(), 8);
        assert!(reports.iter().all(IngestionReport::is_success));
        assert!(max_active.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn max_in_flight_throttles_reads() {
        let max_active = Arc::new(AtomicUsize::new(0));
        let uploads = slow_uploads(5, &max_active);
        let batch = BatchIngestor::new(Ingestor::default(), BatchOptions { max_in_flight: 1 });

        let _ = batch.run(&uploads).await;
        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        assert_eq!(batch.metrics().snapshot().max_active, 1);
    }

    #[tokio::test]
    async fn metrics_split_rejected_parsed_and_failed() {
        let ok: Arc<dyn ContentSource> = Arc::new(InMemorySource::from("{}"));
        let bad: Arc<dyn ContentSource> = Arc::new(InMemorySource::from("{"));
        let uploads = vec![
            Upload::new(FileDescriptor::new("ok.json", 2, "application/json"), Arc::clone(&ok)),
            Upload::new(FileDescriptor::new("bad.json", 1, "application/json"), bad),
            Upload::new(FileDescriptor::new("nope.exe", 2, ""), Arc::clone(&ok)),
            Upload {
                descriptor: None,
                source: ok,
            },
        ];
        let batch = BatchIngestor::new(Ingestor::default(), BatchOptions::default());

        let reports = batch.run(&uploads).await;
        assert!(reports[0].is_success());
        assert!(reports[1].outcome().is_some_and(|o| !o.is_success()));
        assert!(reports[2].rejection().is_some());
        assert!(reports[3].rejection().is_some());

        let snap = batch.metrics().snapshot();
        assert_eq!(snap.started, 4);
        assert_eq!(snap.accepted, 2);
        assert_eq!(snap.rejected, 2);
        assert_eq!(snap.parsed, 1);
        assert_eq!(snap.failed, 1);
        assert!(snap.elapsed.is_some());
    }

    #[test]
    #[should_panic(expected = "max_in_flight must be > 0")]
    fn zero_in_flight_is_rejected() {
        let _ = BatchIngestor::new(Ingestor::default(), BatchOptions { max_in_flight: 0 });
    }
}
