//! IPv4 addressing policy: the worked example of a caller-supplied
//! `KeyAddressing`, bucketing `Ipv4Addr` keys by XOR-folding the two
//! 16-bit halves of the address.

use std::net::Ipv4Addr;

use crate::addressing::KeyAddressing;

/// Buckets IPv4 keys by `low16(addr) ^ high16(addr)`, reduced modulo the
/// bucket count. With the default [`TABLE_SIZE`](Self::TABLE_SIZE) of
/// 2^16 buckets the fold covers the bucket range exactly and the modulo
/// is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Addressing {
    buckets: usize,
}

impl Ipv4Addressing {
    /// Bucket count matching the 16-bit fold: one bucket per fold value.
    pub const TABLE_SIZE: usize = 1 << 16;

    pub fn new() -> Self {
        Self::with_buckets(Self::TABLE_SIZE)
    }

    pub fn with_buckets(buckets: usize) -> Self {
        assert!(buckets > 0, "Ipv4Addressing needs at least one bucket");
        Self { buckets }
    }

    /// XOR of the upper and lower 16 bits of the address.
    pub fn fold(addr: Ipv4Addr) -> u16 {
        let bits = u32::from(addr);
        ((bits & 0xffff) ^ (bits >> 16)) as u16
    }
}

impl Default for Ipv4Addressing {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyAddressing<Ipv4Addr> for Ipv4Addressing {
    fn bucket(&self, key: &Ipv4Addr) -> usize {
        Self::fold(*key) as usize % self.buckets
    }

    fn same_key(&self, a: &Ipv4Addr, b: &Ipv4Addr) -> bool {
        a == b
    }
}
