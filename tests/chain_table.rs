// ChainTable integration suite.
//
// Each test documents what behavior is being verified. The core
// invariants exercised:
// - Round trip: insert then get returns the inserted value.
// - Uniqueness: duplicate insert rejects, keeps the stored value, and
//   hands both arguments back (the table takes nothing).
// - Idempotence: removing an absent key is a no-op, not an error.
// - Update: replaces in place for present keys and surfaces the old
//   value; for absent keys it is a no-op that returns the new value.
// - Sweep: a full sweep visits every entry, signals end-of-sweep, and a
//   following sweep restarts from the first bucket.
// - Concurrency: the coarse lock loses no updates under parallel inserts.
use chaintable::{
    expire, CacheRecord, CacheTable, ChainTable, Insert, Ipv4Addressing, ModAddressing, Update,
};
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

fn table(buckets: usize) -> ChainTable<u64, String, ModAddressing> {
    ChainTable::with_capacity(buckets, ModAddressing::new(buckets))
}

// Test: insert/get round trip and absence reporting.
// Verifies: get returns Some(inserted value) for every inserted key and
// None for never-inserted keys.
#[test]
fn insert_then_get_round_trip() {
    let t = table(8);
    for k in 0u64..32 {
        assert!(t.insert(k, format!("v{k}")).is_inserted());
    }
    assert_eq!(t.len(), 32);
    for k in 0u64..32 {
        assert_eq!(t.get(&k), Some(format!("v{k}")));
        assert!(t.contains(&k));
    }
    assert_eq!(t.get(&99), None);
    assert!(!t.contains(&99));
}

// Test: the collision scenario — capacity 4, hash(k) = k % 4, keys 1 and
// 5 share bucket 1.
// Verifies: both colliding entries are retrievable; removing one leaves
// the other intact.
#[test]
fn colliding_keys_coexist_and_remove_independently() {
    let t = table(4);
    assert!(t.insert(1, "a".to_string()).is_inserted());
    assert!(t.insert(5, "b".to_string()).is_inserted());
    assert_eq!(t.get(&1), Some("a".to_string()));
    assert_eq!(t.get(&5), Some("b".to_string()));

    assert_eq!(t.remove(&1), Some((1, "a".to_string())));
    assert_eq!(t.get(&1), None);
    assert_eq!(t.get(&5), Some("b".to_string()));
    assert_eq!(t.len(), 1);
}

// Test: unique keys policy.
// Verifies: the second insert of an equal key returns Occupied carrying
// both arguments, and the stored value is unchanged.
#[test]
fn duplicate_insert_keeps_original_value() {
    let t = table(4);
    assert!(t.insert(7, "first".to_string()).is_inserted());
    match t.insert(7, "second".to_string()) {
        Insert::Occupied { key, value } => {
            assert_eq!(key, 7);
            assert_eq!(value, "second");
        }
        Insert::Inserted => panic!("expected duplicate insert to be rejected"),
    }
    assert_eq!(t.get(&7), Some("first".to_string()));
    assert_eq!(t.len(), 1);
}

// Test: removal semantics.
// Verifies: remove-then-get reports absence for every removed key, and
// removing a never-inserted key is a no-op.
#[test]
fn remove_is_complete_and_idempotent() {
    let t = table(4);
    for k in 0u64..8 {
        assert!(t.insert(k, k.to_string()).is_inserted());
    }
    for k in 0u64..8 {
        assert_eq!(t.remove(&k), Some((k, k.to_string())));
        assert_eq!(t.get(&k), None);
    }
    assert!(t.is_empty());

    assert_eq!(t.remove(&3), None); // already gone
    assert_eq!(t.remove(&1000), None); // never inserted
    assert!(t.is_empty());
}

// Test: the update scenario — insert(2,"x"), update(2,"y"), update(9,"z")
// with 9 absent.
// Verifies: update replaces observably and surfaces the old value; an
// absent-key update changes nothing and returns the unconsumed value.
#[test]
fn update_replaces_present_and_skips_absent() {
    let t = table(4);
    assert!(t.insert(2, "x".to_string()).is_inserted());

    assert_eq!(
        t.update(&2, "y".to_string()),
        Update::Replaced("x".to_string())
    );
    assert_eq!(t.get(&2), Some("y".to_string()));

    assert_eq!(
        t.update(&9, "z".to_string()),
        Update::Absent("z".to_string())
    );
    assert_eq!(t.get(&9), None);
    assert_eq!(t.len(), 1);
}

// Test: in-place mutation through `modify`.
// Verifies: the closure runs under the lock for present keys and is
// skipped entirely for absent ones.
#[test]
fn modify_mutates_in_place() {
    let t = table(4);
    assert!(t.insert(3, "abc".to_string()).is_inserted());
    let new_len = t.modify(&3, |v| {
        v.push('d');
        v.len()
    });
    assert_eq!(new_len, Some(4));
    assert_eq!(t.get(&3), Some("abcd".to_string()));
    assert_eq!(t.modify(&4, |_| unreachable!("absent key")), None::<()>);
}

// Test: full sweep coverage and restart.
// Verifies: repeated sweep_next visits every entry exactly once when
// nothing mutates concurrently, then yields None, and the next sweep
// starts over from the first bucket.
#[test]
fn sweep_visits_all_then_restarts() {
    let t = table(8);
    let keys: BTreeSet<u64> = (0u64..20).collect();
    for &k in &keys {
        assert!(t.insert(k, k.to_string()).is_inserted());
    }

    let mut seen = Vec::new();
    while let Some(k) = t.sweep_next(|k, _v| *k) {
        seen.push(k);
    }
    assert_eq!(seen.len(), keys.len(), "each entry swept exactly once");
    assert_eq!(seen.iter().copied().collect::<BTreeSet<_>>(), keys);

    // End-of-sweep reached; the next sweep covers everything again.
    let second: BTreeSet<u64> = std::iter::from_fn(|| t.sweep_next(|k, _v| *k)).collect();
    assert_eq!(second, keys);
}

// Test: sweep order within a bucket.
// Verifies: most-recently-inserted entries come first in their chain.
#[test]
fn sweep_yields_recent_inserts_first_within_a_bucket() {
    let t = table(4);
    assert!(t.insert(1, "old".to_string()).is_inserted());
    assert!(t.insert(5, "new".to_string()).is_inserted());
    let order: Vec<u64> = std::iter::from_fn(|| t.sweep_next(|k, _v| *k)).collect();
    assert_eq!(order, vec![5, 1]);
}

// Test: no lost updates under the coarse lock.
// Verifies: two threads inserting distinct, non-colliding keys both
// succeed and both entries are retrievable afterward.
#[test]
fn concurrent_inserts_are_not_lost() {
    let t = Arc::new(table(64));
    let a = Arc::clone(&t);
    let b = Arc::clone(&t);

    let ha = std::thread::spawn(move || {
        for k in 0u64..500 {
            assert!(a.insert(k * 2, format!("even{k}")).is_inserted());
        }
    });
    let hb = std::thread::spawn(move || {
        for k in 0u64..500 {
            assert!(b.insert(k * 2 + 1, format!("odd{k}")).is_inserted());
        }
    });
    ha.join().unwrap();
    hb.join().unwrap();

    assert_eq!(t.len(), 1000);
    for k in 0u64..1000 {
        assert!(t.contains(&k), "key {k} lost under concurrent insert");
    }
}

// Test: mixed concurrent mutation stays structurally sound.
// Verifies: one thread inserting while another removes its own disjoint
// key range leaves exactly the inserted-and-never-removed keys behind.
#[test]
fn concurrent_insert_and_remove_disjoint_ranges() {
    let t = Arc::new(table(16));
    for k in 0u64..200 {
        assert!(t.insert(k, k.to_string()).is_inserted());
    }

    let ins = Arc::clone(&t);
    let rem = Arc::clone(&t);
    let hi = std::thread::spawn(move || {
        for k in 200u64..400 {
            assert!(ins.insert(k, k.to_string()).is_inserted());
        }
    });
    let hr = std::thread::spawn(move || {
        for k in 0u64..200 {
            assert_eq!(rem.remove(&k), Some((k, k.to_string())));
        }
    });
    hi.join().unwrap();
    hr.join().unwrap();

    assert_eq!(t.len(), 200);
    for k in 200u64..400 {
        assert_eq!(t.get(&k), Some(k.to_string()));
    }
    for k in 0u64..200 {
        assert_eq!(t.get(&k), None);
    }
}

// Test: the IPv4 cache shape end to end — insert records, age one via
// touch, run an expiry sweep.
// Verifies: expire removes exactly the records older than the TTL and
// leaves fresh ones retrievable.
#[test]
fn cache_records_expire_after_touch() {
    let t: CacheTable = ChainTable::with_capacity(16, Ipv4Addressing::with_buckets(16));
    let fresh = Ipv4Addr::new(10, 0, 0, 1);
    let stale = Ipv4Addr::new(10, 0, 0, 2);

    assert!(t
        .insert(fresh, CacheRecord::with_domain(1, "fresh.example"))
        .is_inserted());
    assert!(t
        .insert(stale, CacheRecord::with_domain(1, "stale.example"))
        .is_inserted());

    // Age one record two days into the past.
    assert!(t.modify(&stale, |r| r.touch(-2 * 24 * 60 * 60)).is_some());

    let removed = expire(&t, SystemTime::now(), CacheRecord::DEFAULT_TTL);
    assert_eq!(removed, 1);
    assert!(!t.contains(&stale));
    assert_eq!(
        t.read(&fresh, |r| r.domain().to_string()),
        Some("fresh.example".to_string())
    );
}

// Test: expiry with nothing stale.
// Verifies: a sweep over fresh records removes nothing and the cursor is
// reusable for the next sweep.
#[test]
fn expire_leaves_fresh_records() {
    let t: CacheTable = ChainTable::with_capacity(8, Ipv4Addressing::with_buckets(8));
    for host in 1..=5u8 {
        let addr = Ipv4Addr::new(192, 168, 0, host);
        assert!(t.insert(addr, CacheRecord::new()).is_inserted());
    }
    assert_eq!(expire(&t, SystemTime::now(), Duration::from_secs(60)), 0);
    assert_eq!(t.len(), 5);
    // Cursor wrapped: a fresh sweep still sees every entry.
    assert_eq!(expire(&t, SystemTime::now(), Duration::from_secs(60)), 0);
    assert_eq!(t.len(), 5);
}
