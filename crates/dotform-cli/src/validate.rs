//! # Validate Subcommand
//!
//! Binds a flat form submission to a schema document and reports the
//! outcome as JSON:
//!
//! ```json
//! {
//!   "valid": false,
//!   "clean_data": null,
//!   "errors": {"address.zip_code": "The length of zip_code must be between 5 and 5"}
//! }
//! ```
//!
//! Exit codes: `0` valid, `2` invalid submission, `1` any other failure
//! (unreadable files, bad schema, undecodable keys).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use dotform_core::FlatInput;
use dotform_fields::bind_dotted;
use dotform_schema::{Schema, SchemaDocument, ValidatorRegistry};
use serde::Serialize;
use serde_json::Value;

use crate::expand::render;
use crate::input::read_object;

/// Exit code for a submission that failed validation.
pub const EXIT_INVALID: u8 = 2;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (YAML or JSON).
    #[arg(long)]
    pub schema: PathBuf,

    /// Flat JSON submission. Reads stdin if omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Second flat JSON submission whose keys override the first.
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Outcome of validating one submission.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub clean_data: Value,
    pub errors: BTreeMap<String, String>,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    let data = read_object(args.input.as_deref())?;
    let overrides = args
        .overrides
        .as_deref()
        .map(|path| read_object(Some(path)))
        .transpose()?;

    let report = validate_submission(&schema, &data, overrides.as_ref())?;
    println!("{}", render(&serde_json::to_value(&report)?, args.compact)?);
    Ok(if report.valid { 0 } else { EXIT_INVALID })
}

/// Load and build a schema document with the standard validators.
pub fn load_schema(path: &Path) -> Result<Schema> {
    SchemaDocument::from_path(path)
        .and_then(|doc| doc.build(&ValidatorRegistry::standard()))
        .with_context(|| format!("failed to load schema {}", path.display()))
}

/// Bind `data` (and `overrides`) to `schema` and collect the outcome.
pub fn validate_submission(
    schema: &Schema,
    data: &FlatInput,
    overrides: Option<&FlatInput>,
) -> Result<ValidationReport> {
    let mut form = bind_dotted(schema, data, overrides)?;
    let valid = form.is_valid();
    let errors = form.errors();
    tracing::info!(valid, errors = errors.len(), "validated submission");
    Ok(ValidationReport {
        valid,
        clean_data: form.clean_value().unwrap_or(Value::Null),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_object;
    use serde_json::json;

    const SCHEMA: &str = "name: not_none\nage: not_none | as_int\n";

    fn schema() -> Schema {
        SchemaDocument::from_yaml_str(SCHEMA)
            .unwrap()
            .build(&ValidatorRegistry::standard())
            .unwrap()
    }

    #[test]
    fn valid_submission_report() {
        let data = parse_object(r#"{"name": "Ada", "age": "36"}"#).unwrap();
        let report = validate_submission(&schema(), &data, None).unwrap();
        assert!(report.valid);
        assert_eq!(report.clean_data, json!({"name": "Ada", "age": 36}));
        assert!(report.errors.is_empty());
    }

    #[test]
    fn invalid_submission_report() {
        let data = parse_object(r#"{"name": "Ada", "age": "36"}"#).unwrap();
        let overrides = parse_object(r#"{"name": "", "age": "old"}"#).unwrap();
        let report = validate_submission(&schema(), &data, Some(&overrides)).unwrap();
        assert!(!report.valid);
        assert_eq!(report.clean_data, Value::Null);
        assert_eq!(
            serde_json::to_value(&report.errors).unwrap(),
            json!({"age": "age must be a whole number", "name": "name is required."})
        );
    }

    #[test]
    fn load_schema_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "x: unknown_validator\n").unwrap();
        let err = load_schema(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to load schema"));
        assert!(format!("{err:#}").contains("unknown validator 'unknown_validator'"));
    }
}
