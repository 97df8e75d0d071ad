use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::ingestion::IngestionReport;

/// Events emitted by [`super::BatchIngestor`].
#[derive(Debug, Clone)]
pub enum BatchEvent {
    RunStarted { uploads: usize },
    UploadStarted { index: usize, file_name: Option<String> },
    UploadFinished { index: usize, accepted: bool, parsed: bool },
    RunFinished {
        elapsed: Duration,
        metrics: BatchMetricsSnapshot,
    },
}

/// Observer hook for batch events.
pub trait BatchObserver: Send + Sync {
    fn on_event(&self, event: &BatchEvent);
}

/// A simple stderr logger for batch events.
#[derive(Default)]
pub struct StdErrBatchObserver;

impl BatchObserver for StdErrBatchObserver {
    fn on_event(&self, event: &BatchEvent) {
        eprintln!("{event:?}");
    }
}

/// Real-time counters for a batch run.
///
/// The batch ingestor updates these while uploads are in flight; callers can snapshot them at
/// any time.
pub struct BatchMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    started: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
    parsed: AtomicU64,
    failed: AtomicU64,

    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            started: AtomicU64::new(0),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            parsed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.started.store(0, Ordering::SeqCst);
        self.accepted.store(0, Ordering::SeqCst);
        self.rejected.store(0, Ordering::SeqCst);
        self.parsed.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
        self.active.store(0, Ordering::SeqCst);
        self.max_active.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_upload_start(&self) {
        let _ = self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        update_max_usize(&self.max_active, now);
    }

    pub fn on_upload_end(&self, report: &IngestionReport) {
        match report {
            IngestionReport::Rejected(_) => {
                let _ = self.rejected.fetch_add(1, Ordering::SeqCst);
            }
            IngestionReport::Parsed(outcome) => {
                let _ = self.accepted.fetch_add(1, Ordering::SeqCst);
                let counter = if outcome.is_success() { &self.parsed } else { &self.failed };
                let _ = counter.fetch_add(1, Ordering::SeqCst);
            }
        }
        let _ = self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> BatchMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        BatchMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            started: self.started.load(Ordering::SeqCst),
            accepted: self.accepted.load(Ordering::SeqCst),
            rejected: self.rejected.load(Ordering::SeqCst),
            parsed: self.parsed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            max_active: self.max_active.load(Ordering::SeqCst),
        }
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn update_max_usize(dst: &AtomicUsize, now: usize) {
    let _ = dst.fetch_max(now, Ordering::SeqCst);
}

/// Immutable snapshot of [`BatchMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub started: u64,
    /// Uploads that passed validation (parsed + failed).
    pub accepted: u64,
    pub rejected: u64,
    pub parsed: u64,
    pub failed: u64,
    pub max_active: usize,
}

impl fmt::Display for BatchMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, started={}, accepted={}, rejected={}, parsed={}, failed={}, max_active={}, elapsed={:?}",
            self.run_id,
            self.started,
            self.accepted,
            self.rejected,
            self.parsed,
            self.failed,
            self.max_active,
            self.elapsed
        )
    }
}
