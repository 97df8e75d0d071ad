//! `rust-file-ingestion` validates user uploads and parses them into typed in-memory values
//! before they are forwarded to a downstream prediction service.
//!
//! The primary entrypoint is [`ingestion::ingest`], which validates a
//! [`types::FileDescriptor`] against a [`config::ValidationPolicy`], and only for accepted
//! files reads the content and parses it according to the file extension.
//!
//! ## What you can ingest
//!
//! **File formats (dispatched by extension):**
//!
//! - **Tabular**: `.csv` → [`types::TabularData`] (headers + rows keyed by header)
//! - **Sequence records**: `.fasta` → [`types::SequenceDocument`]
//! - **Structured**: `.json` → [`serde_json::Value`]
//! - **Plain text**: `.txt` → [`types::RawText`]
//! - anything else → [`types::RawFallback`] (never an error)
//!
//! The default policy accepts `.csv`, `.fasta`, `.json` and `.txt` files up to 10 MB with
//! names of at most 255 characters. Validation reports every violation, not just the first.
//!
//! ## Quick example: validate, then parse
//!
//! ```rust
//! use rust_file_ingestion::ingestion::{ingest, InMemorySource, IngestionOptions, IngestionReport};
//! use rust_file_ingestion::types::{FileDescriptor, ParsedContent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let descriptor = FileDescriptor::new("spike.fasta", 27, "");
//! let source = InMemorySource::from(">seq1\nACGT\nACGT\n>seq2\nTTTT");
//!
//! match ingest(Some(&descriptor), &source, &IngestionOptions::default()).await {
//!     IngestionReport::Rejected(verdict) => panic!("rejected: {:?}", verdict.errors),
//!     IngestionReport::Parsed(outcome) => match outcome.data() {
//!         Some(ParsedContent::Sequences(doc)) => assert_eq!(doc.count, 2),
//!         other => panic!("unexpected {other:?}"),
//!     },
//! }
//! # }
//! ```
//!
//! ## Validation only
//!
//! ```rust
//! use rust_file_ingestion::{format_file_size, validate_file};
//! use rust_file_ingestion::types::FileDescriptor;
//!
//! let big = FileDescriptor::new("model.exe", 20 * 1024 * 1024, "application/octet-stream");
//! let verdict = validate_file(Some(&big));
//! assert!(!verdict.valid);
//! assert_eq!(verdict.errors.len(), 2);
//! assert_eq!(format_file_size(big.size_bytes), "20 MB");
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: pipeline entrypoints, format dispatch, parsers, content sources, observers
//! - [`validation`]: acceptance checks
//! - [`config`]: validation policy
//! - [`types`]: descriptors, verdicts and parsed values
//! - [`execution`]: concurrent batch ingestion with metrics
//! - [`size`]: human-readable byte sizes
//! - [`error`]: error types used across reading and parsing

pub mod config;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod size;
pub mod types;
pub mod validation;

pub use error::{IngestionError, IngestionResult};
pub use size::format_file_size;
pub use validation::{validate_file, Validator};
