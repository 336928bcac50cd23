//! Error types for list-of-values decoding.
//!
//! None of these errors reach the rendering layer: every caller degrades to an
//! empty or literal result and logs the cause.

use thiserror::Error;

/// Failure to decode a serialized list or selection value.
#[derive(Debug, Error)]
pub enum LovError {
    /// The serialized text is not valid JSON.
    #[error("serialized value is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a serialized JSON value.
pub fn parse_json(raw: &str) -> Result<serde_json::Value, LovError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_ok() {
        let value = parse_json(r#"["a", "b"]"#).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_parse_json_error_display() {
        let err = parse_json("[broken").unwrap_err();
        assert!(err.to_string().starts_with("serialized value is not valid JSON"));
    }

    #[test]
    fn test_parse_json_bare_word_is_error() {
        assert!(matches!(parse_json("apple"), Err(LovError::Parse(_))));
    }
}
