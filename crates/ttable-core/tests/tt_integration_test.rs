//! Integration tests for the public table contract
#![cfg(not(feature = "loom"))]

use ttable_core::payload::{Bound, SearchResult};
use ttable_core::{
    Lifecycle, ReplacementPolicy, SLOT_BYTES, TableConfig, TableError, TranspositionTable,
};

fn active_table(slots: usize) -> TranspositionTable {
    let mut tt = TranspositionTable::new(ReplacementPolicy::DepthPreferred);
    tt.initialize(slots * SLOT_BYTES).expect("small table must allocate");
    tt
}

#[test]
fn test_search_worker_cycle() {
    let tt = active_table(1 << 10);
    let fingerprint = 0x6A09_E667_F3BC_C908;

    // probe before expanding the node
    assert_eq!(tt.probe(fingerprint), None);

    // store after searching it
    let result = SearchResult::new(Bound::LowerBound, 135, 7, 0x0C1C);
    assert!(tt.store(fingerprint, result.for_storage().pack()));

    // transposition reaches the same node again
    let hit = tt.probe(fingerprint).map(SearchResult::unpack).expect("cache hit");
    assert_eq!(hit, result);
    assert_eq!(hit.best_move(), Some(0x0C1C));
}

#[test]
fn test_end_to_end_resize_discards() {
    let mut tt = active_table(8);
    let value = SearchResult::new(Bound::MoveOnly, 0, 3, 0x01).pack();

    assert!(tt.store(0xABCD, value));
    assert_eq!(tt.probe(0xABCD), Some(value));

    tt.resize(8 * SLOT_BYTES).unwrap();
    assert_eq!(tt.probe(0xABCD), None);
}

#[test]
fn test_resize_changes_capacity() {
    let mut tt = active_table(8);
    tt.resize(1000 * SLOT_BYTES).unwrap();
    assert_eq!(tt.capacity(), 512);
    tt.resize(3 * SLOT_BYTES).unwrap();
    assert_eq!(tt.capacity(), 2);
    assert_eq!(tt.lifecycle(), Lifecycle::Active);
}

#[test]
fn test_from_config() {
    let config: TableConfig =
        serde_json::from_str(&format!(r#"{{"hash_bytes": {}, "policy": "always-replace"}}"#, 64 * SLOT_BYTES))
            .unwrap();
    let tt = TranspositionTable::from_config(&config).unwrap();
    assert_eq!(tt.capacity(), 64);
    assert_eq!(tt.policy(), ReplacementPolicy::AlwaysReplace);
    assert_eq!(tt.generation(), 0);
}

#[test]
fn test_from_config_too_small() {
    let config = TableConfig {
        hash_bytes: 1,
        ..Default::default()
    };
    let err = TranspositionTable::from_config(&config).unwrap_err();
    assert!(matches!(err, TableError::CapacityTooSmall { requested: 1, .. }));
    assert!(err.to_string().contains("below the minimum"));
}

#[test]
fn test_collision_rejected_across_whole_table() {
    let tt = active_table(64);
    let cap = tt.capacity() as u64;
    for f in 1..=64u64 {
        assert!(tt.store(f, SearchResult::new(Bound::Exact, f as i32, 1, 0).pack()));
    }
    for f in 1..=64u64 {
        // f + cap shares f's index; must never be reported as a hit
        assert_eq!(tt.probe(f + cap), None);
    }
}

#[test]
fn test_new_search_allows_lazy_eviction() {
    let tt = active_table(8);
    let deep = SearchResult::new(Bound::Exact, 10, 40, 0).pack();
    let shallow = SearchResult::new(Bound::Exact, 20, 2, 0).pack();

    assert!(tt.store(0x100, deep));
    assert!(!tt.store(0x108, shallow));

    tt.new_search();
    assert!(tt.store(0x108, shallow));
    assert_eq!(tt.probe(0x108), Some(shallow));
    assert_eq!(tt.probe_entry(0x108).unwrap().generation, 1);
}

#[test]
fn test_clear_then_reuse() {
    let tt = active_table(16);
    let v = SearchResult::new(Bound::UpperBound, -40, 5, 9).pack();
    assert!(tt.store(0xF00D, v));
    tt.clear().unwrap();
    assert_eq!(tt.probe(0xF00D), None);
    assert!(tt.store(0xF00D, v));
    assert_eq!(tt.probe(0xF00D), Some(v));
}

#[test]
fn test_debug_output() {
    let tt = TranspositionTable::new(ReplacementPolicy::DepthPreferred);
    let s = format!("{tt:?}");
    assert!(s.contains("Uninitialized"));
    assert!(s.contains("DepthPreferred"));
}
