//! ChainTable: the public, thread-safe surface over `ChainCore`.
//!
//! One coarse mutex serializes every operation; each method acquires it
//! for its whole body and releases it before returning. Compound
//! operations (insert, update, remove) do their existence check and their
//! mutation inside the same acquisition through `ChainCore`'s unlocked
//! primitives, so the lock is never taken re-entrantly.

use log::debug;
use parking_lot::Mutex;

use crate::addressing::KeyAddressing;
use crate::chain::{ChainCore, Insert, Update};

/// Fixed-capacity chained hash table guarded by a single table-wide mutex.
///
/// The bucket count is a hard ceiling chosen at construction: the table
/// never rehashes, so a table loaded far past its capacity degrades to
/// linear chain scans rather than resizing. Pick the capacity for the
/// expected population.
///
/// All methods take `&self`; the table is `Send + Sync` when its key,
/// value, and addressing types are `Send`, so callers share it by
/// reference (or `Arc`) across threads.
pub struct ChainTable<K, V, A> {
    inner: Mutex<ChainCore<K, V, A>>,
}

impl<K, V, A> ChainTable<K, V, A>
where
    A: KeyAddressing<K>,
{
    /// Create a table with `capacity` buckets, all empty, and the given
    /// addressing policy.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Allocation failure aborts, as for
    /// any Rust collection under the global allocator.
    pub fn with_capacity(capacity: usize, addressing: A) -> Self {
        let inner = ChainCore::new(capacity, addressing);
        debug!("chain table created with {capacity} buckets");
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Number of buckets, fixed for the table's lifetime.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entry with this key exists.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().find(key).is_some()
    }

    /// Insert `(key, value)`, taking ownership of both, unless an entry
    /// with the same key already exists. On [`Insert::Occupied`] the
    /// stored entry is untouched and both arguments come back to the
    /// caller; the table takes nothing.
    pub fn insert(&self, key: K, value: V) -> Insert<K, V> {
        self.inner.lock().insert(key, value)
    }

    /// Replace the value stored under `key`, returning the displaced old
    /// value as [`Update::Replaced`]. If the key is absent the table is
    /// unchanged and the unconsumed `value` comes back as
    /// [`Update::Absent`].
    pub fn update(&self, key: &K, value: V) -> Update<V> {
        self.inner.lock().update(key, value)
    }

    /// Remove the entry for `key`, returning its pair for the caller to
    /// drop or reuse. Removing an absent key is a no-op, not an error.
    pub fn remove(&self, key: &K) -> Option<(K, V)> {
        self.inner.lock().remove(key)
    }

    /// Clone out the value stored under `key`. `None` always means
    /// "absent"; a stored value is never conflated with absence.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Read the value under `key` through a closure, under the lock.
    pub fn read<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.lock().get(key).map(f)
    }

    /// Mutate the value under `key` in place, under the lock. Returns the
    /// closure's result, or `None` if the key is absent.
    pub fn modify<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.inner.lock().get_mut(key).map(f)
    }

    /// One step of the shared full-table sweep: visit the next live entry
    /// through `f`, or return `None` at end-of-sweep (after which the
    /// next call restarts from the first bucket).
    ///
    /// The cursor is a single table-wide position: only one sweep may be
    /// in progress at a time, and concurrent sweepers would interleave
    /// over the same cursor. Each call holds the lock for exactly one
    /// step, so a full sweep never pins the table. Entries inserted or
    /// removed mid-sweep may be observed zero times or once.
    pub fn sweep_next<R>(&self, f: impl FnOnce(&K, &V) -> R) -> Option<R> {
        let mut inner = self.inner.lock();
        let k = inner.sweep_next()?;
        let (key, value) = inner.entry(k)?;
        Some(f(key, value))
    }

    /// Convenience sweep step that clones the visited entry out.
    pub fn sweep_next_entry(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.sweep_next(|k, v| (k.clone(), v.clone()))
    }
}
