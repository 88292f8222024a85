//! # Binding
//!
//! Entry points that turn a submission into a bound field tree.
//!
//! - [`bind`] takes already-nested data.
//! - [`bind_dotted`] takes flat form data with dotted/coloned keys, merges an
//!   optional second source over the first, drops empty strings (an empty
//!   form control counts as "not submitted") and expands the result.
//! - [`bind_dotted_cached`] does the same, expanding through an
//!   [`ExpandCache`].

use dotform_core::{expand, DotformError, ExpandCache, FlatInput};
use dotform_schema::Schema;
use serde_json::Value;

use crate::field::BoundField;

/// Bind nested data to `schema`.
pub fn bind(schema: &Schema, nested: Value) -> BoundField<'_> {
    BoundField::new(schema, nested)
}

/// Merge two flat submissions and drop entries whose value is `""`.
///
/// Entries of `overrides` replace same-key entries of `data`, so an empty
/// override removes the entry altogether. Keys are compared literally,
/// before expansion.
pub fn merge_submission(data: &FlatInput, overrides: Option<&FlatInput>) -> FlatInput {
    let mut merged = data.clone();
    if let Some(overrides) = overrides {
        merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged.retain(|_, value| value.as_str() != Some(""));
    merged
}

/// Merge, expand and bind flat form data.
///
/// # Errors
///
/// Returns `DotformError::Decode` if the merged keys cannot be expanded.
pub fn bind_dotted<'s>(
    schema: &'s Schema,
    data: &FlatInput,
    overrides: Option<&FlatInput>,
) -> Result<BoundField<'s>, DotformError> {
    let merged = merge_submission(data, overrides);
    let nested = expand(&merged)?;
    tracing::debug!(keys = merged.len(), "binding dotted submission");
    Ok(bind(schema, Value::Object(nested)))
}

/// Like [`bind_dotted`], reusing expansions of identical submissions.
///
/// # Errors
///
/// Returns `DotformError::Decode` if the merged keys cannot be expanded, or
/// `DotformError::Canonicalization` if the submission cannot be
/// fingerprinted.
pub fn bind_dotted_cached<'s>(
    schema: &'s Schema,
    cache: &ExpandCache,
    data: &FlatInput,
    overrides: Option<&FlatInput>,
) -> Result<BoundField<'s>, DotformError> {
    let merged = merge_submission(data, overrides);
    let nested = cache.expand(&merged)?;
    tracing::debug!(keys = merged.len(), cached = cache.len(), "binding dotted submission");
    Ok(bind(schema, Value::Object(nested.as_ref().clone())))
}
