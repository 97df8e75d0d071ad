//! Passthrough parsers: plain text and the raw fallback for unrecognized extensions.

use crate::error::IngestionResult;
use crate::types::{ParsedContent, RawFallback, RawText};

/// Wrap content unchanged as [`RawText`].
pub fn parse_text(input: &str) -> IngestionResult<ParsedContent> {
    Ok(ParsedContent::Text(RawText {
        text: input.to_string(),
    }))
}

/// Wrap content unchanged as [`RawFallback`].
pub fn parse_raw(input: &str) -> IngestionResult<ParsedContent> {
    Ok(ParsedContent::Raw(RawFallback {
        raw: input.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_keeps_whitespace() {
        let input = "  line one\n\tline two\n";
        match parse_text(input).unwrap() {
            ParsedContent::Text(t) => assert_eq!(t.text, input),
            other => panic!("unexpected {other:?}"),
        }
        match parse_raw(input).unwrap() {
            ParsedContent::Raw(r) => assert_eq!(r.raw, input),
            other => panic!("unexpected {other:?}"),
        }
    }
}
