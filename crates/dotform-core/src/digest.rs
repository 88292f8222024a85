//! # Content Fingerprints
//!
//! A [`Fingerprint`] is the SHA-256 digest of [`CanonicalBytes`]. It
//! identifies flat input by content, which is what [`ExpandCache`]
//! keys on.
//!
//! [`ExpandCache`]: crate::cache::ExpandCache

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 content fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the fingerprint as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 fingerprint of canonical bytes.
///
/// Accepts only `&CanonicalBytes`, so every fingerprint in the workspace is
/// computed over the same canonical form.
pub fn fingerprint(data: &CanonicalBytes) -> Fingerprint {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Fingerprint(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a.b": 1})).unwrap();
        assert_eq!(fingerprint(&cb), fingerprint(&cb));
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let mut first = serde_json::Map::new();
        first.insert("x".into(), serde_json::json!(1));
        first.insert("y".into(), serde_json::json!(2));
        let mut second = serde_json::Map::new();
        second.insert("y".into(), serde_json::json!(2));
        second.insert("x".into(), serde_json::json!(1));
        let a = fingerprint(&CanonicalBytes::new(&first).unwrap());
        let b = fingerprint(&CanonicalBytes::new(&second).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_inputs_different_fingerprints() {
        let a = fingerprint(&CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap());
        let b = fingerprint(&CanonicalBytes::new(&serde_json::json!({"a": 2})).unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_sha256_vector() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            fingerprint(&cb).to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_display_prefix() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        let s = fingerprint(&cb).to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }
}
