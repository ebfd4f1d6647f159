#![cfg(not(feature = "loom"))]

use proptest::prelude::*;
use rand::RngCore;
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;
use ttable_core::payload::{Bound, MATE_BOUND, SearchResult};
use ttable_core::{ReplacementPolicy, SLOT_BYTES, TranspositionTable, tt::slot_count_for};

fn arb_bound() -> impl Strategy<Value = Bound> {
    prop::sample::select(vec![Bound::MoveOnly, Bound::LowerBound, Bound::UpperBound, Bound::Exact])
}

fn table(slots: usize, policy: ReplacementPolicy) -> TranspositionTable {
    let mut tt = TranspositionTable::new(policy);
    tt.initialize(slots * SLOT_BYTES).unwrap();
    tt
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_store_then_probe_hits(fingerprint in any::<u64>(), value in any::<u64>(), log2 in 0u32..12) {
        prop_assume!(fingerprint != 0 || value != 0);
        let tt = table(1 << log2, ReplacementPolicy::DepthPreferred);
        prop_assert!(tt.store(fingerprint, value));
        prop_assert_eq!(tt.probe(fingerprint), Some(value));
    }

    #[test]
    fn prop_index_collision_misses(
        fingerprint in 1u64..(u64::MAX >> 1),
        value in any::<u64>(),
        log2 in 0u32..12,
        multiple in 1u64..1024,
    ) {
        let tt = table(1 << log2, ReplacementPolicy::AlwaysReplace);
        let other = fingerprint.wrapping_add(multiple << log2);
        prop_assume!(other != 0 && other != fingerprint);

        prop_assert!(tt.store(fingerprint, value));
        prop_assert_eq!(tt.probe(other), None);
    }

    #[test]
    fn prop_capacity_is_power_of_two_within_budget(bytes in SLOT_BYTES..(64usize << 20)) {
        let slots = slot_count_for(bytes).unwrap();
        prop_assert!(slots.is_power_of_two());
        prop_assert!(slots * SLOT_BYTES <= bytes);
        prop_assert!(slots * 2 * SLOT_BYTES > bytes);
    }

    #[test]
    fn prop_shallower_store_is_dropped(
        fingerprint in 1u64..(1u64 << 40),
        deep in 1u8..=u8::MAX,
        shallow_frac in 0u8..=u8::MAX,
    ) {
        let shallow = shallow_frac % deep;
        let tt = table(16, ReplacementPolicy::DepthPreferred);
        let kept = SearchResult::new(Bound::Exact, 1, deep, 0).pack();
        let dropped = SearchResult::new(Bound::Exact, 2, shallow, 0).pack();
        let other = fingerprint + 16;

        prop_assert!(tt.store(fingerprint, kept));
        prop_assert!(!tt.store(other, dropped));
        prop_assert_eq!(tt.probe(fingerprint), Some(kept));
        prop_assert_eq!(tt.probe(other), None);
    }

    #[test]
    fn prop_mate_scores_stored_as_bounds(
        bound in arb_bound(),
        score in -40_000i32..40_000,
        depth in any::<u8>(),
    ) {
        let out = SearchResult::new(bound, score, depth, 0).for_storage();
        prop_assert!(out.bound == Bound::MoveOnly || out.score.abs() <= MATE_BOUND);
        if score.abs() < MATE_BOUND {
            prop_assert_eq!(out, SearchResult::new(bound, score, depth, 0));
        }
    }

    #[test]
    fn prop_random_fill_never_aliases(seed in any::<u64>()) {
        let tt = table(32, ReplacementPolicy::AlwaysReplace);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut stored = Vec::new();
        for _ in 0..256 {
            let f = rng.next_u64() | 1;
            let v = rng.next_u64();
            tt.store(f, v);
            stored.push((f, v));
        }
        // whatever survived must belong to the key it is reported for
        for (f, _) in &stored {
            if let Some(v) = tt.probe(*f) {
                let last = stored.iter().rev().find(|(g, _)| g == f).map(|(_, v)| *v);
                prop_assert_eq!(Some(v), last);
            }
        }
    }
}
