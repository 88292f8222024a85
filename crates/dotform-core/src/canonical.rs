//! # Canonical Serialization: Stable Bytes for Fingerprints
//!
//! `CanonicalBytes` is the only input accepted by
//! [`fingerprint()`](crate::digest::fingerprint). Two flat inputs with the
//! same content always produce the same bytes, regardless of insertion
//! order or how the mapping was built.
//!
//! Serialization uses `serde_jcs` (RFC 8785, JSON Canonicalization Scheme):
//! sorted keys, compact separators, deterministic number formatting.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Object keys are sorted, separators are compact.
///
/// The inner `Vec<u8>` is private, so downstream code cannot hand a
/// non-canonical byte string to the fingerprint function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(obj)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
