//! Core data model types for ingestion.
//!
//! A caller describes an upload with a [`FileDescriptor`], gets a [`ValidationResult`] back
//! from [`crate::validation`], and, for accepted files, a [`ParseOutcome`] from
//! [`crate::ingestion`]. Every parsed value is [`serde::Serialize`] so it can be forwarded
//! as-is to a downstream service.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IngestionResult;

/// Caller-supplied description of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// File name as submitted (no directory component expected).
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type declared by the uploader (may be empty).
    pub declared_mime_type: String,
    /// Lowercase final dot-segment of `name`, without the dot.
    pub extension: String,
}

impl FileDescriptor {
    /// Create a descriptor, deriving the extension from `name`.
    pub fn new(name: impl Into<String>, size_bytes: u64, declared_mime_type: impl Into<String>) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            size_bytes,
            declared_mime_type: declared_mime_type.into(),
            extension,
        }
    }

    /// Describe a file on disk: size from metadata, MIME type guessed from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        Ok(Self::new(name, metadata.len(), mime))
    }
}

/// Lowercase final dot-segment of a file name.
///
/// A name without any dot is its own final segment (`"README"` -> `"readme"`), and a
/// trailing dot yields an empty extension.
pub fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

/// Verdict of checking a [`FileDescriptor`] against a validation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` iff `errors` is empty.
    pub valid: bool,
    /// Human-readable messages in check order.
    pub errors: Vec<String>,
    /// Snapshot of the checked descriptor; `None` when no file was supplied.
    pub file_info: Option<FileDescriptor>,
}

/// Result of reading and parsing one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ParseOutcome {
    /// Content was read and parsed.
    #[serde(rename_all = "camelCase")]
    Success {
        data: ParsedContent,
        file_info: FileDescriptor,
    },
    /// Content could not be read or parsed.
    #[serde(rename_all = "camelCase")]
    Failure { error_message: String },
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success { .. })
    }

    /// Parsed value, if any.
    pub fn data(&self) -> Option<&ParsedContent> {
        match self {
            ParseOutcome::Success { data, .. } => Some(data),
            ParseOutcome::Failure { .. } => None,
        }
    }

    /// Failure message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ParseOutcome::Success { .. } => None,
            ParseOutcome::Failure { error_message } => Some(error_message),
        }
    }
}

/// Format-specific parsed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedContent {
    Tabular(TabularData),
    Sequences(SequenceDocument),
    Structured(serde_json::Value),
    Text(RawText),
    Raw(RawFallback),
}

impl ParsedContent {
    /// Number of logical items (rows, records, ...) for stats reporting.
    pub fn item_count(&self) -> usize {
        match self {
            ParsedContent::Tabular(t) => t.row_count,
            ParsedContent::Sequences(s) => s.count,
            ParsedContent::Structured(serde_json::Value::Array(items)) => items.len(),
            ParsedContent::Structured(_) | ParsedContent::Text(_) | ParsedContent::Raw(_) => 1,
        }
    }
}

/// One data row of a table, keyed by header.
pub type TabularRow = BTreeMap<String, String>;

/// Parsed delimiter-separated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularData {
    /// Header names in column order. Duplicates are kept.
    pub headers: Vec<String>,
    /// Data rows. A row shorter than `headers` simply lacks the trailing keys.
    pub rows: Vec<TabularRow>,
    /// Always `rows.len()`.
    pub row_count: usize,
}

impl TabularData {
    pub fn new(headers: Vec<String>, rows: Vec<TabularRow>) -> Self {
        let row_count = rows.len();
        Self {
            headers,
            rows,
            row_count,
        }
    }

    /// All values of a column in row order; rows without the key yield `None`.
    pub fn column(&self, header: &str) -> Vec<Option<&str>> {
        self.rows
            .iter()
            .map(|row| row.get(header).map(String::as_str))
            .collect()
    }
}

/// A single sequence record (header line plus concatenated sequence lines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceRecord {
    pub header: String,
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// Sequence length in bytes; one byte per residue for ASCII sequence data.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Parsed sequence-record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceDocument {
    pub records: Vec<SequenceRecord>,
    /// Always `records.len()`.
    pub count: usize,
}

impl SequenceDocument {
    pub fn new(records: Vec<SequenceRecord>) -> Self {
        let count = records.len();
        Self { records, count }
    }

    /// Sum of all record lengths.
    pub fn total_residues(&self) -> usize {
        self.records.iter().map(SequenceRecord::len).sum()
    }
}

/// Plain-text passthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawText {
    pub text: String,
}

/// Passthrough for unrecognized extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawFallback {
    pub raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_final_segment() {
        assert_eq!(extension_of("Genome.FASTA"), "fasta");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("README"), "readme");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn descriptor_derives_extension() {
        let d = FileDescriptor::new("data.CSV", 12, "text/csv");
        assert_eq!(d.extension, "csv");
        assert_eq!(d.size_bytes, 12);
    }

    #[test]
    fn counts_track_lengths() {
        let t = TabularData::new(vec!["a".into()], vec![TabularRow::new(), TabularRow::new()]);
        assert_eq!(t.row_count, 2);

        let doc = SequenceDocument::new(vec![
            SequenceRecord::new("x", "ACGT"),
            SequenceRecord::new("y", "TT"),
        ]);
        assert_eq!(doc.count, 2);
        assert_eq!(doc.total_residues(), 6);
    }

    #[test]
    fn outcome_serializes_with_camel_case_fields() {
        let outcome = ParseOutcome::Success {
            data: ParsedContent::Text(RawText { text: "hi".into() }),
            file_info: FileDescriptor::new("n.txt", 2, "text/plain"),
        };
        let v = serde_json::to_value(&outcome).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["data"]["text"], "hi");
        assert_eq!(v["fileInfo"]["sizeBytes"], 2);
    }
}
