//! Example cache payload: the state/domain/timestamp record the
//! motivating resolver cache stores per IPv4 address, plus the expiry
//! sweep built on the table's cursor. None of this is part of the table's
//! contract; it is the worked caller module.

use std::net::Ipv4Addr;
use std::time::{Duration, SystemTime};

use log::{debug, trace};

use crate::ipv4::Ipv4Addressing;
use crate::table::ChainTable;

/// Longest domain the record stores, in bytes.
pub const MAX_DOMAIN_LEN: usize = 255;

/// A cached resolution record: caller-defined state flag, bounded domain
/// text, and the time the record was stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub state: i32,
    domain: String,
    pub timestamp: SystemTime,
}

impl CacheRecord {
    /// How long a record stays fresh by default: one day.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24);

    /// A zeroed record stamped with the current time.
    pub fn new() -> Self {
        Self {
            state: 0,
            domain: String::new(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn with_domain(state: i32, domain: &str) -> Self {
        let mut record = Self::new();
        record.state = state;
        record.set_domain(domain);
        record
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Store `domain`, truncated to [`MAX_DOMAIN_LEN`] bytes on a char
    /// boundary.
    pub fn set_domain(&mut self, domain: &str) {
        let mut end = domain.len().min(MAX_DOMAIN_LEN);
        while !domain.is_char_boundary(end) {
            end -= 1;
        }
        self.domain.clear();
        self.domain.push_str(&domain[..end]);
    }

    /// Shift the record's timestamp by `delta_secs` (negative values move
    /// it into the past, ageing the record toward expiry).
    pub fn touch(&mut self, delta_secs: i64) {
        if delta_secs >= 0 {
            self.timestamp += Duration::from_secs(delta_secs as u64);
        } else {
            self.timestamp -= Duration::from_secs(delta_secs.unsigned_abs());
        }
    }

    /// Whether the record's age at `now` exceeds `ttl`. Records stamped
    /// in the future are never expired.
    pub fn is_expired(&self, now: SystemTime, ttl: Duration) -> bool {
        match now.duration_since(self.timestamp) {
            Ok(age) => age > ttl,
            Err(_) => false,
        }
    }
}

impl Default for CacheRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// The table shape the resolver cache uses.
pub type CacheTable = ChainTable<Ipv4Addr, CacheRecord, Ipv4Addressing>;

/// Run one full expiry sweep: walk every entry via the table's cursor,
/// collect the keys whose records have outlived `ttl` at `now`, then
/// remove them. Returns the number of records removed.
///
/// Uses the shared sweep cursor, so it must not run concurrently with
/// another sweep. The lock is held one step at a time during the walk and
/// once per removal afterward; an entry re-stamped between the walk and
/// its removal is still removed (last observation wins).
pub fn expire(table: &CacheTable, now: SystemTime, ttl: Duration) -> usize {
    let mut stale = Vec::new();
    while let Some(hit) =
        table.sweep_next(|addr, record| record.is_expired(now, ttl).then_some(*addr))
    {
        if let Some(addr) = hit {
            trace!("expiry sweep: {addr} is stale");
            stale.push(addr);
        }
    }

    let mut removed = 0;
    for addr in &stale {
        if table.remove(addr).is_some() {
            removed += 1;
        }
    }
    debug!("expiry sweep removed {removed} stale entries");
    removed
}
