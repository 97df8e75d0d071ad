//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] (from [`pipeline`]) which:
//!
//! - validates the file descriptor and stops early on rejection
//! - reads the content source once, fully, into memory
//! - picks a parser from the file extension (or the override in [`IngestionOptions`])
//! - optionally reports acceptance/rejection/success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific parsers are also available under:
//! - [`tabular`]
//! - [`sequence`]
//! - [`structured`]
//! - [`text`]

pub mod dispatch;
pub mod observability;
pub mod pipeline;
pub mod sequence;
pub mod source;
pub mod structured;
pub mod tabular;
pub mod text;

pub use dispatch::{select_parser, FileFormat, ParserFn};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver, TracingObserver,
};
pub use pipeline::{ingest, parse_file_content, IngestionOptions, IngestionReport, Ingestor};
pub use source::{CancellationToken, ContentSource, InMemorySource, PathSource, ReaderSource};
pub use tabular::TabularMode;
