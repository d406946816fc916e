//! Conservation properties of the multi-target split.
//!
//! Weights must sum to exactly `WEIGHT_SCALE` and cost/budget shares to
//! exactly their totals for every list length up to the weapon cap; any
//! leakage here would drift the audited RTP.

use crate::engine::HitEngine;
use crate::mocks::FixedRng;
use crate::spread::{normalize_weights, raw_weights, split_by_weight, weighted_budget};
use proptest::prelude::*;
use reefshot_types::arcade::{AREA_MAX_TARGETS, RTP_SCALE, WEIGHT_SCALE};
use reefshot_types::{
    HitCandidate, PlayerId, TargetId, Tier, TierRegistry, WeaponClass,
};

fn area_candidates(distances: &[u64]) -> Vec<HitCandidate> {
    distances
        .iter()
        .enumerate()
        .map(|(i, &distance)| HitCandidate {
            target: TargetId(i as u64),
            tier: Tier::Large,
            rank_signal: distance,
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_weights_sum_to_scale(
        distances in prop::collection::vec(0u64..2_000_000, 1..=AREA_MAX_TARGETS)
    ) {
        let hits = area_candidates(&distances);
        for weapon in [WeaponClass::Area, WeaponClass::Beam] {
            let capped = &hits[..hits.len().min(weapon.cap())];
            let weights = normalize_weights(&raw_weights(capped, weapon));
            prop_assert_eq!(weights.iter().sum::<u64>(), WEIGHT_SCALE);
        }
    }

    #[test]
    fn prop_split_sums_to_total(
        distances in prop::collection::vec(1u64..1_000_000, 1..=AREA_MAX_TARGETS),
        total in 0u64..1_000_000_000,
    ) {
        let hits = area_candidates(&distances);
        let weights = normalize_weights(&raw_weights(&hits, WeaponClass::Area));
        let shares = split_by_weight(total, &weights);
        prop_assert_eq!(shares.len(), weights.len());
        prop_assert_eq!(shares.iter().sum::<u64>(), total);
    }

    #[test]
    fn prop_budget_total_never_exceeds_cost(
        distances in prop::collection::vec(1u64..1_000_000, 1..=AREA_MAX_TARGETS),
        cost in 0u64..1_000_000_000,
    ) {
        let hits = area_candidates(&distances);
        let weights = normalize_weights(&raw_weights(&hits, WeaponClass::Area));
        let rtps = vec![RTP_SCALE as u32; weights.len()];
        // Even at 100% RTP the banked budget never exceeds the spend.
        prop_assert!(weighted_budget(cost, &weights, &rtps) <= cost);
    }
}

#[test]
fn test_cap_enforcement_area() {
    let mut engine = HitEngine::new(TierRegistry::production(), FixedRng::never_kills());
    let hits = area_candidates(&(1..=100u64).collect::<Vec<_>>());

    let outcomes = engine.resolve_multi_hit(PlayerId(1), &hits, 8_000, WeaponClass::Area);
    assert_eq!(outcomes.len(), AREA_MAX_TARGETS);

    // The surviving outcomes correspond to the first eight candidates in
    // caller order; the dropped tail received no outcome and no state.
    for (outcome, hit) in outcomes.iter().zip(&hits) {
        assert_eq!(outcome.target, hit.target);
    }
    for hit in &hits[AREA_MAX_TARGETS..] {
        assert!(engine.get_state(PlayerId(1), hit.target).is_none());
    }
}

#[test]
fn test_cap_enforcement_beam() {
    let mut engine = HitEngine::new(TierRegistry::production(), FixedRng::never_kills());
    let hits = area_candidates(&vec![1; 10]);
    let outcomes = engine.resolve_multi_hit(PlayerId(1), &hits, 6_000, WeaponClass::Beam);
    assert_eq!(outcomes.len(), 6);
}

#[test]
fn test_empty_hit_list_is_a_noop() {
    let mut engine = HitEngine::new(TierRegistry::production(), FixedRng::never_kills());
    let outcomes = engine.resolve_multi_hit(PlayerId(1), &[], 5_000, WeaponClass::Area);
    assert!(outcomes.is_empty());
    assert_eq!(engine.tracked_states(), 0);
}

#[test]
fn test_multi_hit_conserves_cost_and_budget_in_state() {
    // With a never-kill source every share lands in state, so the ledger
    // totals must equal the split totals exactly.
    let mut engine = HitEngine::new(TierRegistry::production(), FixedRng::never_kills());
    let distances = [3, 10, 250, 999, 40, 7, 77, 1_234];
    let hits = area_candidates(&distances);
    let cost = 9_999;

    engine.resolve_multi_hit(PlayerId(1), &hits, cost, WeaponClass::Area);

    let mut total_cost = 0u64;
    let mut total_budget = 0i64;
    for hit in &hits {
        let state = engine
            .get_state(PlayerId(1), hit.target)
            .expect("state created");
        total_cost += state.accumulated_cost;
        total_budget += state.budget;
    }
    assert_eq!(total_cost, cost);

    // All Large tier (90.00% RTP): total banked budget is floor(cost * 0.9).
    assert_eq!(total_budget, (cost as u128 * 9_000 / 10_000) as i64);
}

#[test]
fn test_single_candidate_multi_hit_matches_single_hit() {
    let hits = area_candidates(&[5]);
    let cost = 1_000;

    let mut multi = HitEngine::new(TierRegistry::production(), FixedRng::never_kills());
    let outcomes = multi.resolve_multi_hit(PlayerId(1), &hits, cost, WeaponClass::Area);
    assert_eq!(outcomes.len(), 1);

    let mut single = HitEngine::new(TierRegistry::production(), FixedRng::never_kills());
    let outcome = single.resolve_single_hit(PlayerId(1), TargetId(0), cost, Tier::Large);

    // A one-entry split allocates the full cost and budget, so the state
    // after either path is identical.
    assert_eq!(outcomes[0].state, outcome.state);
    assert_eq!(outcomes[0].reason, outcome.reason);
}

#[test]
fn test_invalid_tier_entries_take_no_weight_slot() {
    // Registry with only Large configured: Medium entries are rejected and
    // the remaining entries split the full cost among themselves.
    let raw = r#"[{"tier": "Large", "rtp_bps": 9000, "pity_threshold": 6000, "reward": 4500}]"#;
    let registry = TierRegistry::from_json(raw).unwrap();
    let mut engine = HitEngine::new(registry, FixedRng::never_kills());

    let hits = vec![
        HitCandidate {
            target: TargetId(0),
            tier: Tier::Large,
            rank_signal: 10,
        },
        HitCandidate {
            target: TargetId(1),
            tier: Tier::Medium,
            rank_signal: 10,
        },
        HitCandidate {
            target: TargetId(2),
            tier: Tier::Large,
            rank_signal: 10,
        },
    ];
    let cost = 1_000;
    let outcomes = engine.resolve_multi_hit(PlayerId(1), &hits, cost, WeaponClass::Area);

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[1].reason,
        reefshot_types::OutcomeReason::InvalidTier
    );
    assert!(engine.get_state(PlayerId(1), TargetId(1)).is_none());

    let spent: u64 = [TargetId(0), TargetId(2)]
        .iter()
        .map(|&t| engine.get_state(PlayerId(1), t).unwrap().accumulated_cost)
        .sum();
    assert_eq!(spent, cost);
}
