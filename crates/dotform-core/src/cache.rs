//! # Expansion Cache
//!
//! Memoizes [`expand`] results keyed by the content [`Fingerprint`] of the
//! flat input. The cache is bounded: once `capacity` entries are held, the
//! oldest entry is evicted first.
//!
//! Decode errors are never cached; a failing input is re-decoded (and fails
//! again) on every call.
//!
//! ## Thread Safety
//!
//! `ExpandCache` is `Send + Sync`. Lookups and inserts go through a single
//! `parking_lot::Mutex`; expansion itself runs outside the lock, so two
//! threads racing on the same new input may both expand it and the second
//! insert is discarded.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::canonical::CanonicalBytes;
use crate::digest::{fingerprint, Fingerprint};
use crate::error::DotformError;
use crate::expand::expand;
use crate::FlatInput;

/// Default number of expansions retained by [`ExpandCache::default()`].
pub const DEFAULT_CAPACITY: usize = 128;

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Fingerprint, Arc<FlatInput>>,
    order: VecDeque<Fingerprint>,
    hits: u64,
    misses: u64,
}

/// A size-bounded, content-keyed memo of [`expand`].
#[derive(Debug)]
pub struct ExpandCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl ExpandCache {
    /// Create a cache holding at most `capacity` expansions.
    ///
    /// A capacity of zero disables retention: every call expands afresh.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Expand `flat`, returning a shared result from the cache when the
    /// same content has been expanded before.
    ///
    /// # Errors
    ///
    /// Returns `DotformError::Decode` if the input cannot be expanded and
    /// `DotformError::Canonicalization` if it cannot be fingerprinted.
    pub fn expand(&self, flat: &FlatInput) -> Result<Arc<FlatInput>, DotformError> {
        let key = fingerprint(&CanonicalBytes::new(flat)?);

        {
            let mut state = self.state.lock();
            if let Some(hit) = state.entries.get(&key).cloned() {
                state.hits += 1;
                tracing::debug!(fingerprint = %key, "expand cache hit");
                return Ok(hit);
            }
            state.misses += 1;
        }

        let expanded = Arc::new(expand(flat)?);
        tracing::debug!(fingerprint = %key, "expand cache miss");

        if self.capacity == 0 {
            return Ok(expanded);
        }

        let mut state = self.state.lock();
        if let Some(existing) = state.entries.get(&key) {
            return Ok(Arc::clone(existing));
        }
        while state.entries.len() >= self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
            tracing::debug!(fingerprint = %oldest, "expand cache eviction");
        }
        state.entries.insert(key, Arc::clone(&expanded));
        state.order.push_back(key);
        Ok(expanded)
    }

    /// Maximum number of retained expansions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of expansions currently retained.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns true if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.state.lock().hits
    }

    /// Number of lookups that required an expansion.
    pub fn misses(&self) -> u64 {
        self.state.lock().misses
    }

    /// Drop every retained expansion. Hit and miss counters are kept.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
    }
}

impl Default for ExpandCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
