//! Fixed-point weighting for multi-target fire events.
//!
//! One area or beam shot splits its cost and RTP budget across up to eight
//! targets. Splits are proportional to per-target weights normalized to
//! [`WEIGHT_SCALE`]; every split assigns the full rounding remainder to the
//! final slot, so weights always sum to exactly `WEIGHT_SCALE` and shares
//! always sum to exactly their total. That remainder-to-last rule is the
//! single rounding-leak prevention mechanism and must be applied identically
//! everywhere a fixed-point value is divided among recipients.

use reefshot_types::arcade::{PROB_SCALE, RTP_SCALE, WEIGHT_SCALE};
use reefshot_types::{HitCandidate, WeaponClass};

/// Raw (un-normalized) weight per candidate.
///
/// Beam weapons rank by list position: the front of the beam absorbs
/// disproportionately more of the shot. Area weapons rank by distance from
/// the impact point; the distance is clamped into `[1, PROB_SCALE]` so an
/// adversarial candidate can neither divide by zero nor zero out the sum.
pub fn raw_weights(hits: &[HitCandidate], weapon: WeaponClass) -> Vec<u64> {
    hits.iter()
        .enumerate()
        .map(|(rank, hit)| match weapon {
            WeaponClass::Beam => PROB_SCALE / (rank as u64 + 1),
            WeaponClass::Area => PROB_SCALE / hit.rank_signal.clamp(1, PROB_SCALE),
        })
        .collect()
}

/// Normalize raw weights so they sum to exactly `WEIGHT_SCALE`.
///
/// The first `n - 1` entries take their truncated proportional share; the
/// last entry absorbs the remainder.
pub fn normalize_weights(raw: &[u64]) -> Vec<u64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let sum: u128 = raw.iter().map(|&w| w as u128).sum();
    debug_assert!(sum > 0, "raw weights are never zero");

    let mut normalized = Vec::with_capacity(raw.len());
    let mut assigned: u64 = 0;
    for &weight in &raw[..raw.len() - 1] {
        let share = (weight as u128 * WEIGHT_SCALE as u128 / sum) as u64;
        assigned += share;
        normalized.push(share);
    }
    normalized.push(WEIGHT_SCALE - assigned);

    debug_assert_eq!(normalized.iter().sum::<u64>(), WEIGHT_SCALE);
    normalized
}

/// Split `total` across recipients proportional to normalized `weights`.
///
/// Shares sum to exactly `total`; the last recipient absorbs the remainder.
pub fn split_by_weight(total: u64, weights: &[u64]) -> Vec<u64> {
    if weights.is_empty() {
        return Vec::new();
    }
    let mut shares = Vec::with_capacity(weights.len());
    let mut assigned: u64 = 0;
    for &weight in &weights[..weights.len() - 1] {
        let share = (total as u128 * weight as u128 / WEIGHT_SCALE as u128) as u64;
        assigned += share;
        shares.push(share);
    }
    shares.push(total - assigned);

    debug_assert_eq!(shares.iter().sum::<u64>(), total);
    shares
}

/// Total budget for one fire event: the cost multiplied by the cost-weighted
/// effective RTP of the truncated hit list, truncated to an integer.
pub fn weighted_budget(cost: u64, weights: &[u64], rtp_bps: &[u32]) -> u64 {
    debug_assert_eq!(weights.len(), rtp_bps.len());
    let weighted_rtp: u128 = weights
        .iter()
        .zip(rtp_bps)
        .map(|(&w, &rtp)| w as u128 * rtp as u128)
        .sum();
    (cost as u128 * weighted_rtp / (WEIGHT_SCALE as u128 * RTP_SCALE as u128)) as u64
}
