//! # Key Expansion: Flat Form Keys to Nested Values
//!
//! Decodes a flat mapping whose keys carry structure into a nested
//! [`serde_json::Value`] tree:
//!
//! ```text
//! {"parent.child1": "v1", "parent.child2": "v2"}  →  {"parent": {"child1": "v1", "child2": "v2"}}
//! {"parent:5": "a", "parent:7": "b"}              →  {"parent": ["a", "b"]}
//! {"parent:0.a": "A", "parent:1": 1}              →  {"parent": [{"a": "A"}, 1]}
//! ```
//!
//! Each key is split at its FIRST delimiter into `(head, delimiter, tail)`.
//! Keys sharing a head are grouped, their tails expanded recursively, and the
//! group becomes an object (`.`) or an array (`:`). Array indices only order
//! the elements: gaps are dropped and the result is always dense.
//!
//! ## Conflicts
//!
//! Conflicts are checked at every level before recursing, so the error
//! names the key fragment at the level where the ambiguity occurs:
//!
//! - a head that is also a naked key → [`DecodeError::NakedAndParent`]
//! - a head used with both delimiters → [`DecodeError::DictAndList`]
//! - an index fragment that is not an integer → [`DecodeError::InvalidIndex`]

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::num::ParseIntError;

use serde_json::Value;

use crate::error::DecodeError;
use crate::{FlatInput, OBJECT_DELIMITER, SEQUENCE_DELIMITER};

/// Expand a flat mapping of delimited keys into a nested mapping.
///
/// An empty input yields an empty mapping.
///
/// # Errors
///
/// Returns a [`DecodeError`] on the first conflict found. No partial result
/// is produced.
pub fn expand(flat: &FlatInput) -> Result<FlatInput, DecodeError> {
    if flat.is_empty() {
        return Ok(FlatInput::new());
    }
    let entries = flat.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    expand_level(entries)
}

/// Keys grouped by their first delimiter at one nesting level.
#[derive(Default)]
struct Level {
    naked: BTreeMap<String, Value>,
    objects: BTreeMap<String, Vec<(String, Value)>>,
    sequences: BTreeMap<String, Vec<(String, Value)>>,
}

impl Level {
    fn partition(entries: Vec<(String, Value)>) -> Self {
        let mut level = Self::default();
        for (key, value) in entries {
            match split_key(&key) {
                None => {
                    level.naked.insert(key, value);
                }
                Some((head, delimiter, tail)) => {
                    let bucket = if delimiter == OBJECT_DELIMITER {
                        &mut level.objects
                    } else {
                        &mut level.sequences
                    };
                    bucket
                        .entry(head.to_string())
                        .or_default()
                        .push((tail.to_string(), value));
                }
            }
        }
        level
    }

    fn check_conflicts(&self) -> Result<(), DecodeError> {
        for head in self.objects.keys().chain(self.sequences.keys()) {
            if self.naked.contains_key(head) {
                return Err(DecodeError::NakedAndParent(head.clone()));
            }
        }
        for head in self.objects.keys() {
            if self.sequences.contains_key(head) {
                return Err(DecodeError::DictAndList(head.clone()));
            }
        }
        Ok(())
    }
}

fn expand_level(entries: Vec<(String, Value)>) -> Result<FlatInput, DecodeError> {
    let level = Level::partition(entries);
    level.check_conflicts()?;

    tracing::trace!(
        naked = level.naked.len(),
        objects = level.objects.len(),
        sequences = level.sequences.len(),
        "expanding key level"
    );

    let mut out = FlatInput::new();
    for (head, children) in level.objects {
        let nested = expand_level(children)?;
        out.insert(head, Value::Object(nested));
    }
    for (head, children) in level.sequences {
        let nested = expand_level(children)?;
        let items = order_by_index(&head, nested)?;
        out.insert(head, Value::Array(items));
    }
    out.extend(level.naked);
    Ok(out)
}

/// Split a key at its first delimiter.
///
/// Returns `None` for naked keys. The tail may contain further delimiters.
fn split_key(key: &str) -> Option<(&str, char, &str)> {
    let pos = key.find([OBJECT_DELIMITER, SEQUENCE_DELIMITER])?;
    let delimiter = if key[pos..].starts_with(OBJECT_DELIMITER) {
        OBJECT_DELIMITER
    } else {
        SEQUENCE_DELIMITER
    };
    Some((&key[..pos], delimiter, &key[pos + 1..]))
}

/// Turn an expanded `{index: value}` mapping into a dense array ordered by
/// the integer value of each index fragment.
///
/// Fragments are compared as integers of any size, so indices wider than
/// a machine word still sort numerically.
fn order_by_index(parent: &str, nested: FlatInput) -> Result<Vec<Value>, DecodeError> {
    let mut indexed = Vec::with_capacity(nested.len());
    for (fragment, value) in nested {
        let index = IndexKey::parse(&fragment).map_err(|source| DecodeError::InvalidIndex {
            parent: parent.to_string(),
            fragment: fragment.clone(),
            source,
        })?;
        indexed.push((index, value));
    }
    indexed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(indexed.into_iter().map(|(_, value)| value).collect())
}

/// A base-10 integer of unbounded width: sign plus magnitude digits with
/// leading zeros stripped.
#[derive(Debug, PartialEq, Eq)]
struct IndexKey {
    negative: bool,
    digits: String,
}

impl IndexKey {
    fn parse(fragment: &str) -> Result<Self, ParseIntError> {
        let (negative, unsigned) = match fragment.as_bytes().first() {
            Some(b'-') => (true, &fragment[1..]),
            Some(b'+') => (false, &fragment[1..]),
            _ => (false, fragment),
        };
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            // Every fragment `i64` accepts is well-formed, so this is
            // always an error and carries the std reason (empty, bad digit).
            fragment.parse::<i64>()?;
        }
        let digits = unsigned.trim_start_matches('0');
        Ok(Self {
            negative: negative && !digits.is_empty(),
            digits: digits.to_string(),
        })
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let magnitude = self
            .digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits));
        match (self.negative, other.negative) {
            (false, false) => magnitude,
            (true, true) => magnitude.reverse(),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
