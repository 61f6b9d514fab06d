//! Caller-supplied bucket addressing.
//!
//! The table does not hash or compare keys itself; an addressing policy
//! decides which bucket a key lives in and when two keys are the same.
//! This keeps key semantics out of the table entirely, so a caller can
//! bucket by whatever structure its keys have (see [`crate::ipv4`] for
//! the IPv4 policy the motivating cache uses).

/// Bucket selection and key equality for a table keyed by `K`.
///
/// Contract:
/// - `bucket` must return a value in `[0, capacity)` for the table it is
///   installed in. Out-of-range values are a caller bug; the table checks
///   this in debug builds and reduces modulo capacity in release builds.
/// - `same_key` must be an equivalence relation, and keys that are
///   `same_key` must map to the same bucket.
/// - Both must be pure with respect to table structure: they may not call
///   back into the table.
pub trait KeyAddressing<K> {
    /// Bucket index for `key`, in `[0, capacity)`.
    fn bucket(&self, key: &K) -> usize;

    /// Whether `a` and `b` are the same key.
    fn same_key(&self, a: &K, b: &K) -> bool;
}

/// `key % buckets` addressing for integer keys.
#[derive(Debug, Clone, Copy)]
pub struct ModAddressing {
    buckets: usize,
}

impl ModAddressing {
    pub fn new(buckets: usize) -> Self {
        assert!(buckets > 0, "ModAddressing needs at least one bucket");
        Self { buckets }
    }
}

impl KeyAddressing<u64> for ModAddressing {
    fn bucket(&self, key: &u64) -> usize {
        (key % self.buckets as u64) as usize
    }

    fn same_key(&self, a: &u64, b: &u64) -> bool {
        a == b
    }
}

impl KeyAddressing<u32> for ModAddressing {
    fn bucket(&self, key: &u32) -> usize {
        (key % self.buckets as u32) as usize
    }

    fn same_key(&self, a: &u32, b: &u32) -> bool {
        a == b
    }
}
