//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types shared across the dotform workspace. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Decode errors abort the whole expansion and carry the offending key
//!   fragment so the caller can point at the bad form field.
//! - Validation failures are *not* errors: they are values recorded in the
//!   bound field tree (see `dotform-schema`).

use std::num::ParseIntError;

use thiserror::Error;

/// Top-level error type for dotform.
#[derive(Error, Debug)]
pub enum DotformError {
    /// Flat input could not be decoded into a nested value.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Canonical serialization failed while fingerprinting input.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error raised by the key expander.
///
/// Every variant is unrecoverable for the whole decode call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A key appears both on its own and as the prefix of other keys,
    /// e.g. `parent` and `parent.child`.
    #[error("'{0}' specified as both naked and parent key")]
    NakedAndParent(String),

    /// A prefix is used with both delimiters, e.g. `parent.a` and `parent:1`.
    #[error("'{0}' specified as both dict and list")]
    DictAndList(String),

    /// A sequence index fragment is not a base-10 integer.
    #[error("invalid sequence index '{fragment}' under '{parent}': {source}")]
    InvalidIndex {
        /// The key whose children were being ordered.
        parent: String,
        /// The fragment that failed to parse.
        fragment: String,
        /// The underlying integer parse failure.
        source: ParseIntError,
    },
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
