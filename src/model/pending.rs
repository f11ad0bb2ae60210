//! Per-row in-flight operation flags

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::types::RowKey;

#[derive(Debug, Default)]
struct PendingInner {
    entries: HashMap<RowKey, u64>,
    next_token: u64,
}

/// Tracks which rows have an operation in flight.
///
/// Cloning yields another handle to the same set. Entries are only created
/// through [`PendingOps::begin`] and disappear when the returned guard drops,
/// whatever the outcome of the operation was.
#[derive(Clone, Debug, Default)]
pub struct PendingOps {
    inner: Arc<Mutex<PendingInner>>,
}

/// Scoped pending flag; clears its row on drop.
#[derive(Debug)]
#[must_use = "the row stops being pending as soon as the guard is dropped"]
pub struct PendingGuard {
    ops: PendingOps,
    key: RowKey,
    token: u64,
}

impl PendingGuard {
    #[cfg(test)]
    pub fn key(&self) -> &RowKey {
        &self.key
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut inner = self.ops.lock();
        // The entry may have been cleared as stale and begun again by a newer operation
        if inner.entries.get(&self.key) == Some(&self.token) {
            inner.entries.remove(&self.key);
            tracing::trace!(list = %self.key.list, song_id = %self.key.song_id, "Pending flag released");
        }
    }
}

impl PendingOps {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PendingInner> {
        // Entries stay consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `key` pending. Returns `None` if an operation on it is already in flight.
    pub fn begin(&self, key: RowKey) -> Option<PendingGuard> {
        let mut inner = self.lock();
        if inner.entries.contains_key(&key) {
            tracing::debug!(list = %key.list, song_id = %key.song_id, "Row already pending");
            return None;
        }
        inner.next_token += 1;
        let token = inner.next_token;
        inner.entries.insert(key.clone(), token);
        drop(inner);

        Some(PendingGuard {
            ops: self.clone(),
            key,
            token,
        })
    }

    pub fn is_pending(&self, key: &RowKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Drop entries the predicate rejects. Their guards become no-ops.
    pub fn retain(&self, mut keep: impl FnMut(&RowKey) -> bool) {
        self.lock().entries.retain(|key, _| keep(key));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
