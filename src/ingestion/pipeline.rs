//! Validate → read → dispatch → parse.
//!
//! Most callers should use [`ingest`] (or an [`Ingestor`] holding a custom policy), which
//! validates first and only reads the content source for accepted files.
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the descriptor's
//!   extension.
//! - If an [`super::observability::IngestionObserver`] is provided, acceptance, rejection,
//!   success, failure and alerts are reported to it.

use std::fmt;
use std::sync::Arc;

use crate::error::IngestionError;
use crate::types::{FileDescriptor, ParseOutcome, ValidationResult};
use crate::validation::Validator;

use super::dispatch::FileFormat;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::source::{CancellationToken, ContentSource, read_text_cancellable};
use super::tabular::TabularMode;

/// Prefix of failure messages for unreadable sources.
pub const READ_FAILURE_PREFIX: &str = "Failed to read file";
/// Prefix of failure messages for malformed content.
pub const PARSE_FAILURE_PREFIX: &str = "Failed to parse file";
/// Failure message for a cancelled read.
pub const CANCELLED_MESSAGE: &str = "File read cancelled";

/// Options controlling parsing behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<FileFormat>,
    /// How `.csv` content is split into cells.
    pub tabular_mode: TabularMode,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
    /// Optional token that aborts the content read.
    pub cancellation: Option<CancellationToken>,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("tabular_mode", &self.tabular_mode)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            tabular_mode: TabularMode::Simple,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
            cancellation: None,
        }
    }
}

/// Result of [`ingest`]: either a validation rejection or a parse outcome.
///
/// Keeping the two apart lets a UI say "file rejected" and "file unreadable" differently.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestionReport {
    /// The file failed validation; the content source was not read.
    Rejected(ValidationResult),
    /// The file was accepted and its content read and parsed (successfully or not).
    Parsed(ParseOutcome),
}

impl IngestionReport {
    /// `true` only for an accepted file whose content parsed.
    pub fn is_success(&self) -> bool {
        matches!(self, IngestionReport::Parsed(outcome) if outcome.is_success())
    }

    pub fn outcome(&self) -> Option<&ParseOutcome> {
        match self {
            IngestionReport::Parsed(outcome) => Some(outcome),
            IngestionReport::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&ValidationResult> {
        match self {
            IngestionReport::Rejected(result) => Some(result),
            IngestionReport::Parsed(_) => None,
        }
    }
}

/// Read `source` fully and parse it according to the descriptor's extension.
///
/// This does not validate; call [`crate::validation::Validator::validate`] first (or use
/// [`ingest`]). Every failure is returned as [`ParseOutcome::Failure`].
///
/// # Examples
///
/// ```rust
/// use rust_file_ingestion::ingestion::{parse_file_content, InMemorySource, IngestionOptions};
/// use rust_file_ingestion::types::{FileDescriptor, ParsedContent};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let descriptor = FileDescriptor::new("table.csv", 11, "text/csv");
/// let source = InMemorySource::from("a,b\n1,2\n3,4");
/// let outcome = parse_file_content(&descriptor, &source, &IngestionOptions::default()).await;
///
/// match outcome.data() {
///     Some(ParsedContent::Tabular(t)) => assert_eq!(t.row_count, 2),
///     other => panic!("unexpected {other:?}"),
/// }
/// # }
/// ```
pub async fn parse_file_content(
    descriptor: &FileDescriptor,
    source: &dyn ContentSource,
    options: &IngestionOptions,
) -> ParseOutcome {
    let format = options
        .format
        .unwrap_or_else(|| FileFormat::from_extension(&descriptor.extension));
    let ctx = IngestionContext {
        file_name: descriptor.name.clone(),
        format,
    };

    let text = match read_text_cancellable(source, options.cancellation.as_ref()).await {
        Ok(text) => text,
        Err(e) => {
            let severity = severity_for_error(&e);
            let message = match e {
                IngestionError::Cancelled => CANCELLED_MESSAGE.to_string(),
                other => format!("{READ_FAILURE_PREFIX}: {other}"),
            };
            return fail(options, &ctx, severity, message);
        }
    };

    tracing::debug!(file = %descriptor.name, %format, bytes = text.len(), "content read");

    let parser = format.parser_with(options.tabular_mode);
    match parser(&text) {
        Ok(data) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(
                    &ctx,
                    IngestionStats {
                        items: data.item_count(),
                        bytes: text.len(),
                    },
                );
            }
            ParseOutcome::Success {
                data,
                file_info: descriptor.clone(),
            }
        }
        Err(e) => {
            let severity = severity_for_error(&e);
            fail(options, &ctx, severity, format!("{PARSE_FAILURE_PREFIX}: {e}"))
        }
    }
}

/// Validate with the default policy, then read and parse accepted files.
pub async fn ingest(
    descriptor: Option<&FileDescriptor>,
    source: &dyn ContentSource,
    options: &IngestionOptions,
) -> IngestionReport {
    Ingestor::default()
        .with_options(options.clone())
        .ingest(descriptor, source)
        .await
}

/// Validator plus parsing options; several ingestors with different policies can coexist.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    validator: Validator,
    options: IngestionOptions,
}

impl Ingestor {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator,
            options: IngestionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: IngestionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn options(&self) -> &IngestionOptions {
        &self.options
    }

    /// Validate `descriptor`; read and parse `source` only if it is accepted.
    pub async fn ingest(&self, descriptor: Option<&FileDescriptor>, source: &dyn ContentSource) -> IngestionReport {
        let verdict = self.validator.validate(descriptor);
        let descriptor = match descriptor {
            Some(d) if verdict.valid => d,
            _ => {
                tracing::debug!(errors = ?verdict.errors, "upload rejected");
                if let Some(obs) = self.options.observer.as_ref() {
                    obs.on_rejected(descriptor.map(|d| d.name.as_str()), &verdict);
                }
                return IngestionReport::Rejected(verdict);
            }
        };

        if let Some(obs) = self.options.observer.as_ref() {
            let format = self
                .options
                .format
                .unwrap_or_else(|| FileFormat::from_extension(&descriptor.extension));
            obs.on_accepted(&IngestionContext {
                file_name: descriptor.name.clone(),
                format,
            });
        }

        IngestionReport::Parsed(parse_file_content(descriptor, source, &self.options).await)
    }
}

fn fail(options: &IngestionOptions, ctx: &IngestionContext, severity: IngestionSeverity, message: String) -> ParseOutcome {
    tracing::debug!(file = %ctx.file_name, ?severity, error = %message, "ingestion failed");
    if let Some(obs) = options.observer.as_ref() {
        obs.on_failure(ctx, severity, &message);
        if severity >= options.alert_at_or_above {
            obs.on_alert(ctx, severity, &message);
        }
    }
    ParseOutcome::Failure { error_message: message }
}

/// Severity used for observer callbacks and alert thresholds.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Cancelled => IngestionSeverity::Warning,
        e if e.is_read_failure() => IngestionSeverity::Critical,
        IngestionError::Io(_) | IngestionError::Json(_) | IngestionError::Csv(_) => IngestionSeverity::Error,
        IngestionError::InvalidPolicy { .. } => IngestionSeverity::Error,
    }
}
