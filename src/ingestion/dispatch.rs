//! Extension → parser dispatch.
//!
//! Every extension maps to some parser: the four recognized ones get a dedicated parser and
//! anything else degrades to the raw passthrough.

use std::fmt;

use serde::Serialize;

use crate::error::IngestionResult;
use crate::types::ParsedContent;

use super::tabular::TabularMode;
use super::{sequence, structured, tabular, text};

/// Signature shared by all parsers.
pub type ParserFn = fn(&str) -> IngestionResult<ParsedContent>;

/// Content formats recognized by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-separated table (`.csv`).
    Tabular,
    /// Sequence records (`.fasta`).
    Sequence,
    /// JSON document (`.json`).
    Structured,
    /// Plain text (`.txt`).
    PlainText,
    /// Anything else.
    Raw,
}

impl FileFormat {
    /// Map a file extension (case-insensitive, leading dot optional) to a format.
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Self::Tabular,
            "fasta" => Self::Sequence,
            "json" => Self::Structured,
            "txt" => Self::PlainText,
            _ => Self::Raw,
        }
    }

    /// Parser for this format using the default (simple) tabular mode.
    pub fn parser(self) -> ParserFn {
        self.parser_with(TabularMode::Simple)
    }

    /// Parser for this format with an explicit tabular mode.
    pub fn parser_with(self, tabular_mode: TabularMode) -> ParserFn {
        match (self, tabular_mode) {
            (Self::Tabular, TabularMode::Simple) => tabular::parse,
            (Self::Tabular, TabularMode::Quoted) => tabular::parse_quoted_content,
            (Self::Sequence, _) => sequence::parse,
            (Self::Structured, _) => structured::parse,
            (Self::PlainText, _) => text::parse_text,
            (Self::Raw, _) => text::parse_raw,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tabular => "tabular",
            Self::Sequence => "sequence",
            Self::Structured => "structured",
            Self::PlainText => "text",
            Self::Raw => "raw",
        };
        f.write_str(s)
    }
}

/// Select the parser for a file extension.
pub fn select_parser(extension: &str) -> ParserFn {
    FileFormat::from_extension(extension).parser()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_extensions_map_to_formats() {
        assert_eq!(FileFormat::from_extension("csv"), FileFormat::Tabular);
        assert_eq!(FileFormat::from_extension(".FASTA"), FileFormat::Sequence);
        assert_eq!(FileFormat::from_extension("Json"), FileFormat::Structured);
        assert_eq!(FileFormat::from_extension("txt"), FileFormat::PlainText);
    }

    #[test]
    fn unknown_extensions_fall_back_to_raw() {
        for ext in ["", "xlsx", "fa", "tsv"] {
            assert_eq!(FileFormat::from_extension(ext), FileFormat::Raw);
        }
        match select_parser("bin")("payload").unwrap() {
            ParsedContent::Raw(r) => assert_eq!(r.raw, "payload"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn selected_parsers_produce_matching_variants() {
        assert!(matches!(select_parser("csv")("a\n1").unwrap(), ParsedContent::Tabular(_)));
        assert!(matches!(select_parser("fasta")(">a\nA").unwrap(), ParsedContent::Sequences(_)));
        assert!(matches!(select_parser("json")("{}").unwrap(), ParsedContent::Structured(_)));
        assert!(matches!(select_parser("txt")("x").unwrap(), ParsedContent::Text(_)));
        assert!(select_parser("json")("{").is_err());
    }
}
