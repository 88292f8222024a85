//! # Input Loading
//!
//! Reads JSON objects from a file or from standard input.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use dotform_core::FlatInput;
use serde_json::Value;

/// Read a JSON object from `path`, or from stdin when `path` is `None`.
pub fn read_object(path: Option<&Path>) -> Result<FlatInput> {
    let (text, source) = match path {
        Some(path) => (
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            (text, "<stdin>".to_string())
        }
    };
    parse_object(&text).with_context(|| format!("invalid input in {source}"))
}

/// Parse `text` as a JSON object.
pub fn parse_object(text: &str) -> Result<FlatInput> {
    match serde_json::from_str::<Value>(text).context("not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object, got {}", kind_of(&other)),
    }
}

fn kind_of(value: &Value) -> &'static str {
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
    fn parse_object_accepts_objects() {
        let map = parse_object(r#"{"a.b": "1"}"#).unwrap();
        assert_eq!(map["a.b"], "1");
    }

    #[test]
    fn parse_object_rejects_other_json() {
        let err = parse_object("[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "expected a JSON object, got an array");
        assert!(parse_object("{").is_err());
    }

    #[test]
    fn read_object_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, r#"{"x": 1}"#).unwrap();
        assert_eq!(read_object(Some(&path)).unwrap()["x"], 1);

        let missing = dir.path().join("missing.json");
        let err = read_object(Some(&missing)).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
