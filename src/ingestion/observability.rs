use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::ValidationResult;

use super::dispatch::FileFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (file rejected by policy, read cancelled).
    Warning,
    /// Error-level event (content could not be parsed).
    Error,
    /// Critical error (content source could not be read).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Submitted file name.
    pub file_name: String,
    /// Format selected for parsing.
    pub format: FileFormat,
}

/// Minimal stats reported on successful parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Rows, records, or 1 for passthrough formats.
    pub items: usize,
    /// Bytes of decoded text handed to the parser.
    pub bytes: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called when a file passes validation.
    fn on_accepted(&self, _ctx: &IngestionContext) {}

    /// Called when a file is rejected by validation. Content is never read in that case.
    fn on_rejected(&self, _file_name: Option<&str>, _result: &ValidationResult) {}

    /// Called when parsing succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when reading or parsing fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _message: &str) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        self.on_failure(ctx, severity, message)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_accepted(&self, ctx: &IngestionContext) {
        for o in &self.observers {
            o.on_accepted(ctx);
        }
    }

    fn on_rejected(&self, file_name: Option<&str>, result: &ValidationResult) {
        for o in &self.observers {
            o.on_rejected(file_name, result);
        }
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        for o in &self.observers {
            o.on_failure(ctx, severity, message);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        for o in &self.observers {
            o.on_alert(ctx, severity, message);
        }
    }
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_rejected(&self, file_name: Option<&str>, result: &ValidationResult) {
        eprintln!(
            "[ingest][rejected] file={} errors={:?}",
            file_name.unwrap_or("<none>"),
            result.errors
        );
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!(
            "[ingest][ok] format={} file={} items={} bytes={}",
            ctx.format, ctx.file_name, stats.items, stats.bytes
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        eprintln!(
            "[ingest][{:?}] format={} file={} err={}",
            severity, ctx.format, ctx.file_name, message
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        eprintln!(
            "[ALERT][ingest][{:?}] format={} file={} err={}",
            severity, ctx.format, ctx.file_name, message
        );
    }
}

/// Emits ingestion events as structured `tracing` events under the `ingest` target.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_accepted(&self, ctx: &IngestionContext) {
        tracing::debug!(target: "ingest", file = %ctx.file_name, format = %ctx.format, "file accepted");
    }

    fn on_rejected(&self, file_name: Option<&str>, result: &ValidationResult) {
        tracing::info!(
            target: "ingest",
            file = file_name.unwrap_or("<none>"),
            errors = ?result.errors,
            "file rejected"
        );
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            target: "ingest",
            file = %ctx.file_name,
            format = %ctx.format,
            items = stats.items,
            bytes = stats.bytes,
            "file parsed"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        tracing::warn!(
            target: "ingest",
            file = %ctx.file_name,
            format = %ctx.format,
            severity = ?severity,
            error = message,
            "file unreadable"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        tracing::error!(
            target: "ingest",
            file = %ctx.file_name,
            format = %ctx.format,
            severity = ?severity,
            error = message,
            "ingestion alert"
        );
    }
}

/// Appends ingestion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_rejected(&self, file_name: Option<&str>, result: &ValidationResult) {
        self.append_line(&format!(
            "{} rejected file={} errors={}",
            unix_ts(),
            file_name.unwrap_or("<none>"),
            result.errors.join("; ")
        ));
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line(&format!(
            "{} ok format={} file={} items={} bytes={}",
            unix_ts(),
            ctx.format,
            ctx.file_name,
            stats.items,
            stats.bytes
        ));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        self.append_line(&format!(
            "{} fail severity={:?} format={} file={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.file_name,
            message
        ));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, message: &str) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={} file={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.file_name,
            message
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
