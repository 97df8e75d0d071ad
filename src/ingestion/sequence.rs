//! Sequence-record (FASTA) parsing.
//!
//! ```text
//! >seq1 description
//! ACGT
//! ACGT
//! >seq2
//! TTTT
//! ```
//!
//! A `>` line opens a record whose header is the rest of the line, trimmed. Every other line
//! is trimmed and appended to the open record's sequence. Lines before the first marker are
//! ignored, and input without any marker yields an empty document.

use crate::error::IngestionResult;
use crate::types::{ParsedContent, SequenceDocument, SequenceRecord};

/// Record marker character.
pub const RECORD_MARKER: char = '>';

/// Parser entry used by the format dispatcher.
pub fn parse(input: &str) -> IngestionResult<ParsedContent> {
    Ok(ParsedContent::Sequences(parse_sequences(input)))
}

enum ScanState {
    NoOpenRecord,
    OpenRecord { header: String, sequence: String },
}

impl ScanState {
    /// Consume one line, pushing a finished record into `out` when a new one starts.
    fn step(self, line: &str, out: &mut Vec<SequenceRecord>) -> Self {
        match line.strip_prefix(RECORD_MARKER) {
            Some(rest) => {
                self.flush(out);
                ScanState::OpenRecord {
                    header: rest.trim().to_string(),
                    sequence: String::new(),
                }
            }
            None => match self {
                ScanState::NoOpenRecord => ScanState::NoOpenRecord,
                ScanState::OpenRecord { header, mut sequence } => {
                    sequence.push_str(line.trim());
                    ScanState::OpenRecord { header, sequence }
                }
            },
        }
    }

    fn flush(self, out: &mut Vec<SequenceRecord>) {
        if let ScanState::OpenRecord { header, sequence } = self {
            out.push(SequenceRecord { header, sequence });
        }
    }
}

/// Parse sequence records in a single left-to-right pass.
pub fn parse_sequences(input: &str) -> SequenceDocument {
    let mut records = Vec::new();
    let mut state = ScanState::NoOpenRecord;

    for line in input.trim().split('\n') {
        state = state.step(line, &mut records);
    }
    state.flush(&mut records);

    SequenceDocument::new(records)
}
