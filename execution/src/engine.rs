//! Hit resolution.
//!
//! Each shot converts weapon cost into RTP budget for the (player, target)
//! pair it lands on, then decides kill-or-survive through three gates:
//!
//! 1. **Budget gate** — a kill is never executed while the accumulated
//!    budget cannot cover the tier's reward, so payout debt is bounded.
//! 2. **Hard pity** — once accumulated cost crosses the tier threshold the
//!    next affordable hit kills unconditionally.
//! 3. **Probabilistic roll** — otherwise the kill chance is this shot's own
//!    affordability (`budget_delta / reward`), ramped up by 50% as the
//!    target approaches the pity threshold.
//!
//! Multi-target shots split one fire event's cost and budget across the
//! capped hit list with the remainder-to-last rule ([`crate::spread`]) and
//! run the same three gates per target on the allocated slices.

use crate::ledger::TargetLedger;
use crate::rng::HouseRng;
use crate::spread::{normalize_weights, raw_weights, split_by_weight, weighted_budget};
use reefshot_types::arcade::{MAX_SHOT_COST, PROB_SCALE, RTP_SCALE};
use reefshot_types::{
    HitCandidate, Outcome, OutcomeReason, PlayerId, TargetId, TargetState, Tier, TierConfig,
    TierRegistry, WeaponClass,
};
use tracing::{debug, trace};

/// The hit-resolution engine: tier configuration, per-target state, and an
/// injected randomness source.
///
/// Logically single-threaded per call: every operation completes its
/// read-modify-write before returning. The calling runtime must not
/// interleave two calls touching the same (player, target) pair; wrap the
/// engine in a [`crate::RoomActor`] to get that guarantee by construction.
pub struct HitEngine<R: HouseRng> {
    registry: TierRegistry,
    ledger: TargetLedger,
    rng: R,
}

impl<R: HouseRng> HitEngine<R> {
    pub fn new(registry: TierRegistry, rng: R) -> Self {
        Self {
            registry,
            ledger: TargetLedger::new(),
            rng,
        }
    }

    /// Resolve one single-target hit.
    ///
    /// `cost` is the fixed-point spend already authorized for this shot.
    /// An unknown tier yields an `invalid_tier` outcome and touches no state.
    pub fn resolve_single_hit(
        &mut self,
        player: PlayerId,
        target: TargetId,
        cost: u64,
        tier: Tier,
    ) -> Outcome {
        let Some(config) = self.registry.get(tier).copied() else {
            return Outcome::rejected(target, OutcomeReason::InvalidTier);
        };
        let cost = cost.min(MAX_SHOT_COST);
        let budget_delta = (cost as u128 * config.rtp_bps as u128 / RTP_SCALE as u128) as u64;
        self.resolve_allocated(player, target, cost, budget_delta, config)
    }

    /// Resolve one area/beam fire event against up to `weapon.cap()` targets.
    ///
    /// The hit list is truncated to the cap in caller order; entries beyond
    /// the cap receive no outcome. Cost and total budget are split across
    /// the surviving entries by fixed-point weight, and each entry then runs
    /// the single-target gates on its own slice.
    pub fn resolve_multi_hit(
        &mut self,
        player: PlayerId,
        hits: &[HitCandidate],
        cost: u64,
        weapon: WeaponClass,
    ) -> Vec<Outcome> {
        if hits.is_empty() {
            return Vec::new();
        }
        let cost = cost.min(MAX_SHOT_COST);
        let truncated = &hits[..hits.len().min(weapon.cap())];

        // Partition out entries with no tier configuration: they get a
        // structured rejection and take no weight slot, so the remaining
        // entries split the full cost among themselves.
        let mut outcomes: Vec<Option<Outcome>> = (0..truncated.len()).map(|_| None).collect();
        let mut valid = Vec::with_capacity(truncated.len());
        for (index, hit) in truncated.iter().enumerate() {
            match self.registry.get(hit.tier).copied() {
                Some(config) => valid.push((index, *hit, config)),
                None => {
                    outcomes[index] = Some(Outcome::rejected(hit.target, OutcomeReason::InvalidTier))
                }
            }
        }
        if valid.is_empty() {
            return outcomes.into_iter().flatten().collect();
        }

        let candidates: Vec<HitCandidate> = valid.iter().map(|(_, hit, _)| *hit).collect();
        let rtps: Vec<u32> = valid.iter().map(|(_, _, config)| config.rtp_bps).collect();
        let weights = normalize_weights(&raw_weights(&candidates, weapon));
        let budget_total = weighted_budget(cost, &weights, &rtps);
        let budget_shares = split_by_weight(budget_total, &weights);
        let cost_shares = split_by_weight(cost, &weights);
        trace!(
            ?player,
            ?weapon,
            cost,
            budget_total,
            targets = candidates.len(),
            "splitting fire event"
        );

        for (slot, (index, hit, config)) in valid.into_iter().enumerate() {
            outcomes[index] = Some(self.resolve_allocated(
                player,
                hit.target,
                cost_shares[slot],
                budget_shares[slot],
                config,
            ));
        }
        outcomes.into_iter().flatten().collect()
    }

    /// Read-only snapshot of a pair's accounting state.
    pub fn get_state(&self, player: PlayerId, target: TargetId) -> Option<TargetState> {
        self.ledger.get(player, target).copied()
    }

    /// Remove every player's entry for a target. Call on kill and despawn.
    pub fn evict_by_target(&mut self, target: TargetId) -> usize {
        self.ledger.evict_by_target(target)
    }

    /// Remove every entry for a player. Call on disconnect.
    pub fn evict_by_player(&mut self, player: PlayerId) -> usize {
        self.ledger.evict_by_player(player)
    }

    /// Number of live state entries, for leak monitoring.
    pub fn tracked_states(&self) -> usize {
        self.ledger.len()
    }

    pub fn registry(&self) -> &TierRegistry {
        &self.registry
    }

    /// Core resolution over an already-allocated cost/budget slice.
    ///
    /// Single-target hits pass the full cost and its own budget delta;
    /// multi-target entries pass their weighted shares.
    fn resolve_allocated(
        &mut self,
        player: PlayerId,
        target: TargetId,
        cost_share: u64,
        budget_alloc: u64,
        config: TierConfig,
    ) -> Outcome {
        let state = self.ledger.get_or_create(player, target);
        if state.killed {
            // Terminal until evicted: no mutation, no payout.
            return Outcome::survived(target, OutcomeReason::AlreadyKilled, *state);
        }

        state.budget = state.budget.saturating_add(budget_alloc as i64);
        state.accumulated_cost = state.accumulated_cost.saturating_add(cost_share);
        let reward = config.reward as i64;

        if state.budget < reward {
            // Cannot afford a payout yet. Crossing the threshold here only
            // latches the promise; the kill waits for funds.
            if state.accumulated_cost >= config.pity_threshold {
                state.pity_latched = true;
            }
            return Outcome::survived(target, OutcomeReason::BudgetGate, *state);
        }

        if state.pity_latched || state.accumulated_cost >= config.pity_threshold {
            let outcome = Self::execute_kill(
                state,
                &mut self.rng,
                target,
                OutcomeReason::HardPity,
                config.reward,
            );
            debug!(?player, ?target, reward = config.reward, "hard pity kill");
            return outcome;
        }

        // Base chance is this shot's own affordability, ramped toward 1.5x
        // as accumulated cost approaches the pity threshold.
        let p_base =
            (budget_alloc as u128 * PROB_SCALE as u128 / config.reward as u128).min(PROB_SCALE as u128);
        let progress = (state.accumulated_cost as u128 * PROB_SCALE as u128
            / config.pity_threshold as u128)
            .min(PROB_SCALE as u128);
        let ramp = p_base / 2;
        let p = (p_base + ramp * progress / PROB_SCALE as u128).min(PROB_SCALE as u128) as u64;

        let draw = self.rng.draw();
        if draw < p {
            let outcome = Self::execute_kill(
                state,
                &mut self.rng,
                target,
                OutcomeReason::Probability,
                config.reward,
            );
            debug!(?player, ?target, reward = config.reward, p, draw, "probability kill");
            return outcome;
        }
        Outcome::survived(target, OutcomeReason::RollFailed, *state)
    }

    /// Execute a kill: pay the reward out of the budget (possibly into
    /// bounded debt), mark the state terminal, and mint the event id.
    fn execute_kill(
        state: &mut TargetState,
        rng: &mut R,
        target: TargetId,
        reason: OutcomeReason,
        reward: u64,
    ) -> Outcome {
        // Only reachable once the budget covers the reward, which bounds the
        // post-kill excursion to the controlled-debt floor of -reward.
        state.budget -= reward as i64;
        state.killed = true;
        let kill_event_id = rng.next_kill_id();
        Outcome::killed(target, reason, kill_event_id, reward, *state)
    }
}
