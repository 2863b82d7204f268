//! Handle arena
//!
//! Exporting an object inserts a strong reference and hands back a token;
//! the reference stays alive until the token is released. Releasing is the
//! only way an entry ever leaves the table.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::token::OpaqueToken;

/// Thread-safe arena of strong references keyed by [`OpaqueToken`].
pub struct HandleTable<T: ?Sized> {
    entries: DashMap<OpaqueToken, Arc<T>>,
    next_id: AtomicU64,
}

impl<T: ?Sized> HandleTable<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1), // 0 is OpaqueToken::NONE
        }
    }

    /// Retain `value` and return the token naming it.
    ///
    /// Exporting the same `Arc` twice yields two independent tokens, each of
    /// which must be released on its own.
    pub fn export(&self, value: Arc<T>) -> OpaqueToken {
        let token = OpaqueToken::from_raw(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.entries.insert(token, value);
        token
    }

    pub fn get(&self, token: OpaqueToken) -> Option<Arc<T>> {
        self.entries.get(&token).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the table's reference. Returns it so the caller decides when the
    /// object is finalized.
    pub fn release(&self, token: OpaqueToken) -> Option<Arc<T>> {
        self.entries.remove(&token).map(|(_, value)| value)
    }

    pub fn contains(&self, token: OpaqueToken) -> bool {
        self.entries.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release every entry, returning how many were still live.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}

impl<T: ?Sized> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for HandleTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleTable")
            .field("live", &self.entries.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}
