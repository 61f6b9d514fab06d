//! chaintable: a fixed-capacity, mutex-guarded chained hash table with a
//! resumable full-table sweep cursor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative table for caches that key on opaque data
//!   (the motivating caller maps IPv4 addresses to cached resolution
//!   records), built in layers so each piece can be reasoned about
//!   independently.
//! - Layers:
//!   - ChainCore<K, V, A>: structural layer. A fixed array of bucket
//!     heads plus a slotmap arena of entries; each bucket is a singly
//!     linked chain threaded through the arena. Also owns the sweep
//!     cursor. Single-threaded, no locking.
//!   - ChainTable<K, V, A>: public API. Wraps ChainCore in one coarse
//!     mutex; every operation locks for its whole body and releases
//!     before returning.
//!
//! Constraints
//! - Fixed capacity: the bucket count is chosen at construction and never
//!   changes. There is no rehashing; long chains degrade lookups to
//!   O(chain length) rather than triggering a resize.
//! - Caller-supplied addressing: bucket selection and key equality come
//!   from a `KeyAddressing` policy, not from `Hash`/`Eq` bounds. The
//!   table never inspects keys or values itself.
//! - Unique keys: at most one entry per chain matches any probe key;
//!   duplicate inserts are rejected and hand the key and value back.
//! - Ownership: the table owns inserted keys and values and drops them on
//!   removal or teardown. Operations that decline to consume an argument
//!   (duplicate insert, update of an absent key) return it to the caller.
//!
//! Sweep cursor
//! - One cursor, stored in the table, shared by all callers: only one
//!   sweep may be in progress at a time. Each `sweep_next` call holds the
//!   lock for a single step, so periodic full-table scans (e.g. expiry)
//!   never pin the lock for the whole traversal.
//! - A finished sweep yields `None` and resets the cursor; the next call
//!   restarts from bucket 0. Order is ascending bucket index, then
//!   most-recent-insert-first within a bucket. There is no snapshot
//!   isolation: entries inserted or removed mid-sweep may be seen zero
//!   times or once.
//!
//! Notes and non-goals
//! - One table-wide mutex, not per-bucket striping. Throughput is traded
//!   for the simplest possible correctness argument.
//! - Capacity bounds buckets, not entries; there is no entry ceiling.
//! - No persistence, no background threads, no internal retries.
//! - `ipv4` and `record` are worked caller policies (IPv4 addressing, a
//!   state/domain/timestamp cache record with expiry and touch), not part
//!   of the table's contract.

mod addressing;
mod chain;
mod table;

pub mod ipv4;
pub mod record;

// Public surface
pub use addressing::{KeyAddressing, ModAddressing};
pub use chain::{Insert, Update};
pub use ipv4::Ipv4Addressing;
pub use record::{expire, CacheRecord, CacheTable};
pub use table::ChainTable;
