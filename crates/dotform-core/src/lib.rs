//! # dotform-core: Foundational Types for dotform
//!
//! This crate is the bottom of the dotform workspace. It turns the flat
//! key/value mappings produced by naive form serialization into nested
//! trees, and back again. The binding and CLI crates build on
//! `dotform-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`serde_json::Value` is the nested value model.** Decoded input is a
//!    plain JSON tree: scalars, string-keyed objects, dense arrays.
//!
//! 2. **Strict decoding.** [`expand`] fails fast on ambiguous input: a key
//!    used both as a leaf and as a parent, a prefix used both as an object
//!    and as an array, or a non-integer array index. There is no partial
//!    result.
//!
//! 3. **Content-keyed memoization.** [`ExpandCache`] keys results by a
//!    SHA-256 [`Fingerprint`] of the [`CanonicalBytes`] of the input, never
//!    by reference identity.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dotform-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod cache;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod expand;
pub mod flatten;

/// A flat (or nested) mapping of string keys to JSON values.
///
/// Form input arrives as a `FlatInput` whose keys carry structure through
/// the [`OBJECT_DELIMITER`] and [`SEQUENCE_DELIMITER`]; [`expand`] returns
/// the same type with the structure decoded.
pub type FlatInput = serde_json::Map<String, serde_json::Value>;

/// Separates a parent key from a named child: `address.street`.
pub const OBJECT_DELIMITER: char = '.';

/// Separates a parent key from a sequence position: `emails:0`.
pub const SEQUENCE_DELIMITER: char = ':';

// Re-export primary types for ergonomic imports.
pub use cache::ExpandCache;
pub use canonical::CanonicalBytes;
pub use digest::{fingerprint, Fingerprint};
pub use error::{CanonicalizationError, DecodeError, DotformError};
pub use expand::expand;
pub use flatten::flatten;
