//! Structured-object (JSON) parsing.
//!
//! Content is deserialized strictly into a [`serde_json::Value`]. Any JSON document is
//! accepted (object, array or scalar); malformed input is an error carrying serde_json's
//! message, including line and column.

use crate::error::IngestionResult;
use crate::types::ParsedContent;

/// Parser entry used by the format dispatcher.
pub fn parse(input: &str) -> IngestionResult<ParsedContent> {
    parse_structured(input).map(ParsedContent::Structured)
}

/// Deserialize `input` as a single JSON value.
pub fn parse_structured(input: &str) -> IngestionResult<serde_json::Value> {
    Ok(serde_json::from_str::<serde_json::Value>(input)?)
}

#[cfg(test)]
mod tests {
    use super::parse_structured;
    use serde_json::json;

    #[test]
    fn parses_objects_arrays_and_scalars() {
        assert_eq!(parse_structured(r#"{"a":[1,2]}"#).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(parse_structured(" [1, {\"b\": null}] ").unwrap(), json!([1, {"b": null}]));
        assert_eq!(parse_structured("42").unwrap(), json!(42));
    }

    #[test]
    fn malformed_input_reports_position() {
        let err = parse_structured("{\"a\": }").unwrap_err();
        let msg = err.to_string();
        assert!(!msg.is_empty());
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_structured("").is_err());
    }
}
