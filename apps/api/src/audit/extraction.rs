//! Locates and parses the fenced JSON block inside raw extractor text.
//!
//! The extractor is asked to answer with prose plus one ```json fenced block.
//! Only the first such block is used; everything else is display text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

static JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").unwrap());

#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    /// No fenced JSON block, or one that is not a JSON object.
    #[error("malformed extraction: {0}")]
    MalformedExtraction(String),

    /// The block parsed but `signals` has the wrong shape.
    #[error("invalid signals: {0}")]
    InvalidSignals(String),
}

/// Returns the body of the first ```json fenced block.
pub fn locate_json_block(text: &str) -> Option<&str> {
    JSON_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Parses the first fenced block into a JSON object.
pub fn parse_extraction(text: &str) -> Result<Map<String, Value>, ExtractionError> {
    let block = locate_json_block(text).ok_or_else(|| {
        ExtractionError::MalformedExtraction("no fenced JSON block in extractor output".to_string())
    })?;

    // The parser error stays here; callers only see the typed failure.
    match serde_json::from_str::<Value>(block) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(ExtractionError::MalformedExtraction(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ExtractionError::MalformedExtraction(format!(
            "JSON block does not parse at line {}, column {}",
            e.line(),
            e.column()
        ))),
    }
}

/// Extractor text with the first fenced block removed, for display.
pub fn strip_json_block(text: &str) -> String {
    JSON_BLOCK.replace(text, "").trim().to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locates_first_block() {
        let text = "Intro\n```json\n{\"a\": 1}\n```\nthen\n```json\n{\"b\": 2}\n```";
        assert_eq!(locate_json_block(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_locates_multiline_block_with_crlf() {
        let text = "```json\r\n{\r\n  \"a\": [1, 2]\r\n}\r\n```";
        let object = parse_extraction(text).unwrap();
        assert_eq!(object["a"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_untagged_fence_is_not_a_json_block() {
        assert_eq!(locate_json_block("```\n{\"a\": 1}\n```"), None);
    }

    #[test]
    fn test_missing_block_is_malformed() {
        let err = parse_extraction("I could not read this document.").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedExtraction(_)));
    }

    #[test]
    fn test_unparseable_block_is_malformed() {
        let err = parse_extraction("```json\n{\"signals\": {\n```").unwrap_err();
        match err {
            ExtractionError::MalformedExtraction(msg) => assert!(msg.contains("line")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_object_block_is_malformed() {
        let err = parse_extraction("```json\n[1, 2, 3]\n```").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MalformedExtraction("expected a JSON object, got an array".to_string())
        );
    }

    #[test]
    fn test_strip_removes_block_and_trims() {
        let text = "  Audit summary.\n```json\n{\"a\": 1}\n```\nGood luck.  ";
        assert_eq!(strip_json_block(text), "Audit summary.\n\nGood luck.");
    }

    #[test]
    fn test_strip_without_block_only_trims() {
        assert_eq!(strip_json_block("  plain text \n"), "plain text");
    }
}
