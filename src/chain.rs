//! ChainCore: structural layer. Bucket heads, arena-backed chains, and the
//! sweep cursor. No locking here; `ChainTable` serializes access.

use slotmap::{DefaultKey, SlotMap};

use crate::addressing::KeyAddressing;

/// Outcome of an insert. On `Occupied` the table took nothing: the key and
/// value come back to the caller, and the stored entry is untouched.
#[must_use = "a rejected insert hands the key and value back"]
#[derive(Debug, PartialEq, Eq)]
pub enum Insert<K, V> {
    Inserted,
    Occupied { key: K, value: V },
}

impl<K, V> Insert<K, V> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insert::Inserted)
    }
}

/// Outcome of an update. `Replaced` carries the previous value out of the
/// table so it is never silently retained; `Absent` hands the unconsumed
/// new value back.
#[must_use = "an update surfaces either the old value or the unconsumed new one"]
#[derive(Debug, PartialEq, Eq)]
pub enum Update<V> {
    Replaced(V),
    Absent(V),
}

impl<V> Update<V> {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Update::Replaced(_))
    }

    /// The previous value, if one was replaced.
    pub fn replaced(self) -> Option<V> {
        match self {
            Update::Replaced(v) => Some(v),
            Update::Absent(_) => None,
        }
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<DefaultKey>,
}

/// Fixed-capacity chained table, single-threaded.
///
/// Entries live in a slotmap arena; buckets hold the arena key of their
/// chain head and each entry links to the next one in its chain. The
/// arena's generational keys make a stale cursor resolve to `None` instead
/// of dangling when the entry it parked on has been removed.
pub(crate) struct ChainCore<K, V, A> {
    addressing: A,
    heads: Box<[Option<DefaultKey>]>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    // Sweep cursor: next entry to yield within the current chain, and the
    // next bucket to examine once the chain runs out.
    cursor: Option<DefaultKey>,
    next_bucket: usize,
}

impl<K, V, A> ChainCore<K, V, A>
where
    A: KeyAddressing<K>,
{
    pub fn new(capacity: usize, addressing: A) -> Self {
        assert!(capacity > 0, "chain table capacity must be non-zero");
        Self {
            addressing,
            heads: vec![None; capacity].into_boxed_slice(),
            slots: SlotMap::with_key(),
            cursor: None,
            next_bucket: 0,
        }
    }

    fn bucket_of(&self, key: &K) -> usize {
        let b = self.addressing.bucket(key);
        debug_assert!(
            b < self.heads.len(),
            "addressing returned bucket {b} for a table with {} buckets",
            self.heads.len()
        );
        b % self.heads.len()
    }

    pub fn capacity(&self) -> usize {
        self.heads.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Unlocked lookup: walk the chain at `bucket(key)` until `same_key`
    /// matches. Every compound operation goes through this, never through
    /// the locking wrapper above it.
    pub fn find(&self, key: &K) -> Option<DefaultKey> {
        let mut cur = self.heads[self.bucket_of(key)];
        while let Some(k) = cur {
            let entry = &self.slots[k];
            if self.addressing.same_key(&entry.key, key) {
                return Some(k);
            }
            cur = entry.next;
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|k| &self.slots[k].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let k = self.find(key)?;
        Some(&mut self.slots[k].value)
    }

    /// Prepend a new entry to its chain, unless an equal key already
    /// exists. Most-recently-inserted entries sit at the chain head.
    pub fn insert(&mut self, key: K, value: V) -> Insert<K, V> {
        if self.find(&key).is_some() {
            return Insert::Occupied { key, value };
        }
        let bucket = self.bucket_of(&key);
        let next = self.heads[bucket];
        let k = self.slots.insert(Entry { key, value, next });
        self.heads[bucket] = Some(k);
        Insert::Inserted
    }

    /// Replace the value of an existing entry in place. The key is only
    /// probed, never stored; the displaced old value is returned.
    pub fn update(&mut self, key: &K, value: V) -> Update<V> {
        match self.find(key) {
            Some(k) => Update::Replaced(std::mem::replace(&mut self.slots[k].value, value)),
            None => Update::Absent(value),
        }
    }

    /// Unlink and return the entry for `key`, relinking its predecessor
    /// (or the bucket head) to its successor. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let bucket = self.bucket_of(key);
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            if self.addressing.same_key(&self.slots[k].key, key) {
                let next = self.slots[k].next;
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.slots[p].next = next,
                }
                let entry = self.slots.remove(k).unwrap();
                return Some((entry.key, entry.value));
            }
            prev = cur;
            cur = self.slots[k].next;
        }
        None
    }

    /// One step of the shared full-table sweep. Yields the arena key of
    /// the next live entry, or `None` at end-of-sweep (which also resets
    /// the cursor so the following call restarts at bucket 0).
    ///
    /// If the entry the cursor parked on was removed since the previous
    /// step, the sweep moves on to the next bucket; the remainder of that
    /// chain is skipped, which is within the no-snapshot contract.
    pub fn sweep_next(&mut self) -> Option<DefaultKey> {
        if let Some(k) = self.cursor {
            if let Some(entry) = self.slots.get(k) {
                self.cursor = entry.next;
                return Some(k);
            }
            self.cursor = None;
        }
        while self.next_bucket < self.heads.len() {
            let bucket = self.next_bucket;
            self.next_bucket += 1;
            if let Some(head) = self.heads[bucket] {
                self.cursor = self.slots[head].next;
                return Some(head);
            }
        }
        // Wrapped: a subsequent call starts a fresh sweep from bucket 0.
        self.next_bucket = 0;
        self.cursor = None;
        None
    }

    pub fn entry(&self, k: DefaultKey) -> Option<(&K, &V)> {
        self.slots.get(k).map(|e| (&e.key, &e.value))
    }
}
