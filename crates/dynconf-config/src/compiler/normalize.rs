//! JSON5 to canonical JSON normalization.

use crate::CompileError;
use serde_json::Value;

/// Parse relaxed JSON5 text into a JSON value.
pub(crate) fn parse_relaxed(text: &str, origin: &str) -> Result<Value, CompileError> {
    json5::from_str(text).map_err(|err| CompileError::MalformedConfigText {
        origin: origin.to_string(),
        message: err.to_string(),
    })
}

/// Convert relaxed text into canonical JSON text (sorted keys, compact).
pub fn normalize(text: &str) -> Result<String, CompileError> {
    let value = parse_relaxed(text, "<inline>")?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Relaxed syntax parses.
    #[test]
    fn accepts_comments_unquoted_keys_and_trailing_commas() {
        let text = "{\n  // table list\n  tables: [\n    { name: 'users', table: \"users\", },\n  ],\n}";
        let canonical = normalize(text).expect("normalize");
        assert_eq!(canonical, r#"{"tables":[{"name":"users","table":"users"}]}"#);
    }

    /// Normalizing canonical output leaves it unchanged.
    #[test]
    fn canonical_output_is_a_fixed_point() {
        let text = "{ b: [1, 2.5, true, null], a: { z: 'x', y: \"q\\\"uote\" } /* tail */ }";
        let once = normalize(text).expect("once");
        let twice = normalize(&once).expect("twice");
        assert_eq!(once, twice);
    }

    /// Malformed text is reported with its origin.
    #[test]
    fn malformed_text_is_reported() {
        let err = normalize("{ tables: [ }").unwrap_err();
        assert!(matches!(err, CompileError::MalformedConfigText { .. }));
    }
}
