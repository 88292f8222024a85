//! # Schema Errors
//!
//! Errors raised while *building* a schema. Failures of the data being
//! validated are [`ValidationFailure`](crate::ValidationFailure) values,
//! not errors.

use thiserror::Error;

/// Error during schema construction or schema document loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A sequence literal did not contain exactly one template element.
    #[error("sequence schema must have exactly one child, got {0}")]
    SequenceArity(usize),

    /// A pattern-based validator was given an invalid regular expression.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A schema document is structurally invalid or names an unknown
    /// validator.
    #[error("schema document error at '{path}': {reason}")]
    Document {
        /// Dotted path to the offending node within the document.
        path: String,
        /// Reason the node was rejected.
        reason: String,
    },

    /// The schema document could not be parsed.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error reading a schema document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub(crate) fn document(path: &str, reason: impl Into<String>) -> Self {
        Self::Document {
            path: if path.is_empty() { "(root)".to_string() } else { path.to_string() },
            reason: reason.into(),
        }
    }
}
