//! Monte-Carlo driver for the hit-resolution engine.
//!
//! Fires a configurable number of shots at a seeded engine and reports the
//! realized payout ratio against the tier's configured target. Useful for
//! validating a tier table before it ships: run a few million shots at the
//! costs the client actually charges and read off the observed RTP.

use anyhow::{bail, Context, Result};
use clap::Parser;
use reefshot_execution::mocks::SeededRng;
use reefshot_execution::HitEngine;
use reefshot_types::arcade::{AREA_MAX_TARGETS, RTP_SCALE};
use reefshot_types::{
    HitCandidate, OutcomeReason, PlayerId, TargetId, Tier, TierRegistry, WeaponClass,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of shots to fire.
    #[arg(long, default_value_t = 1_000_000)]
    shots: u64,

    /// Cost charged per shot, in chips.
    #[arg(long, default_value_t = 1_000)]
    cost: u64,

    /// Target tier: small, medium, large, elite, or boss.
    #[arg(long, default_value = "large")]
    tier: String,

    /// Seed for the deterministic randomness source.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of targets hit per shot; exercises the multi-target split
    /// (single-target resolution when omitted).
    #[arg(long)]
    spread: Option<usize>,

    /// Weapon class for spread shots: area or beam.
    #[arg(long, default_value = "area")]
    weapon: String,

    /// Path to a JSON tier table overriding the compiled defaults.
    #[arg(long)]
    tier_table: Option<PathBuf>,

    /// Emit the summary as JSON on stdout instead of log lines.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug)]
struct Config {
    shots: u64,
    cost: u64,
    tier: Tier,
    seed: u64,
    spread: Option<usize>,
    weapon: WeaponClass,
    registry: TierRegistry,
    json: bool,
}

fn parse_tier(value: &str) -> Result<Tier> {
    match value.to_ascii_lowercase().as_str() {
        "small" => Ok(Tier::Small),
        "medium" => Ok(Tier::Medium),
        "large" => Ok(Tier::Large),
        "elite" => Ok(Tier::Elite),
        "boss" => Ok(Tier::Boss),
        other => bail!("unknown tier: {other}"),
    }
}

fn parse_weapon(value: &str) -> Result<WeaponClass> {
    match value.to_ascii_lowercase().as_str() {
        "area" => Ok(WeaponClass::Area),
        "beam" => Ok(WeaponClass::Beam),
        other => bail!("unknown weapon class: {other}"),
    }
}

fn build_config(args: &Args) -> Result<Config> {
    if args.shots == 0 {
        bail!("shots must be > 0");
    }
    if args.cost == 0 {
        bail!("cost must be > 0");
    }
    if let Some(0) = args.spread {
        bail!("spread must be > 0 when set");
    }

    let registry = match &args.tier_table {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read tier table {}", path.display()))?;
            TierRegistry::from_json(&raw).context("invalid tier table")?
        }
        None => TierRegistry::production(),
    };

    let tier = parse_tier(&args.tier)?;
    if registry.get(tier).is_none() {
        bail!("tier {} missing from tier table", args.tier);
    }

    Ok(Config {
        shots: args.shots,
        cost: args.cost,
        tier,
        seed: args.seed,
        spread: args.spread,
        weapon: parse_weapon(&args.weapon)?,
        registry,
        json: args.json,
    })
}

#[derive(Debug, Default, Serialize)]
struct Tally {
    shots: u64,
    kills: u64,
    hard_pity_kills: u64,
    probability_kills: u64,
    budget_gated: u64,
    rolls_failed: u64,
    total_cost: u64,
    total_reward: u64,
    observed_rtp_bps: u64,
    target_rtp_bps: u32,
}

impl Tally {
    fn record(&mut self, kill: bool, reason: OutcomeReason, reward: Option<u64>) {
        if kill {
            self.kills += 1;
            self.total_reward += reward.unwrap_or(0);
            match reason {
                OutcomeReason::HardPity => self.hard_pity_kills += 1,
                OutcomeReason::Probability => self.probability_kills += 1,
                _ => {}
            }
        } else {
            match reason {
                OutcomeReason::BudgetGate => self.budget_gated += 1,
                OutcomeReason::RollFailed => self.rolls_failed += 1,
                _ => {}
            }
        }
    }

    fn finalize(&mut self, target_rtp_bps: u32) {
        self.target_rtp_bps = target_rtp_bps;
        if self.total_cost > 0 {
            self.observed_rtp_bps =
                (self.total_reward as u128 * RTP_SCALE as u128 / self.total_cost as u128) as u64;
        }
    }
}

/// Fire shots at one target at a time, evicting after each kill.
fn run_single(config: &Config) -> Tally {
    let mut engine = HitEngine::new(config.registry.clone(), SeededRng::new(config.seed));
    let mut tally = Tally::default();
    let mut target = 0u64;
    for _ in 0..config.shots {
        let outcome =
            engine.resolve_single_hit(PlayerId(1), TargetId(target), config.cost, config.tier);
        tally.shots += 1;
        tally.total_cost += config.cost;
        tally.record(outcome.kill, outcome.reason, outcome.reward);
        if outcome.kill {
            engine.evict_by_target(TargetId(target));
            target += 1;
        }
    }
    tally
}

/// Fire volleys over a moving window of targets, replacing killed targets
/// with fresh ones so every volley hits the full spread.
fn run_spread(config: &Config, spread: usize) -> Tally {
    let spread = spread.min(config.weapon.cap()).min(AREA_MAX_TARGETS);
    let mut engine = HitEngine::new(config.registry.clone(), SeededRng::new(config.seed));
    let mut tally = Tally::default();
    let mut next_target = spread as u64;
    let mut window: Vec<TargetId> = (0..spread as u64).map(TargetId).collect();

    for volley in 0..config.shots {
        let hits: Vec<HitCandidate> = window
            .iter()
            .enumerate()
            .map(|(slot, &target)| HitCandidate {
                target,
                tier: config.tier,
                // Synthetic but varied geometry so the split is non-uniform.
                rank_signal: (volley * 37 + slot as u64 * 113) % 500 + 1,
            })
            .collect();
        let outcomes = engine.resolve_multi_hit(PlayerId(1), &hits, config.cost, config.weapon);
        tally.shots += 1;
        tally.total_cost += config.cost;
        for outcome in &outcomes {
            tally.record(outcome.kill, outcome.reason, outcome.reward);
            if outcome.kill {
                engine.evict_by_target(outcome.target);
                let slot = window
                    .iter()
                    .position(|&t| t == outcome.target)
                    .unwrap_or(0);
                window[slot] = TargetId(next_target);
                next_target += 1;
            }
        }
    }
    tally
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = build_config(&args)?;
    let target_rtp_bps = config
        .registry
        .get(config.tier)
        .map(|c| c.rtp_bps)
        .unwrap_or(0);

    info!(
        shots = config.shots,
        cost = config.cost,
        tier = ?config.tier,
        seed = config.seed,
        spread = ?config.spread,
        "starting simulation"
    );

    let mut tally = match config.spread {
        Some(spread) => run_spread(&config, spread),
        None => run_single(&config),
    };
    tally.finalize(target_rtp_bps);

    if config.json {
        println!("{}", serde_json::to_string_pretty(&tally)?);
    } else {
        info!(
            shots = tally.shots,
            kills = tally.kills,
            hard_pity = tally.hard_pity_kills,
            probability = tally.probability_kills,
            budget_gated = tally.budget_gated,
            rolls_failed = tally.rolls_failed,
            "simulation complete"
        );
        info!(
            total_cost = tally.total_cost,
            total_reward = tally.total_reward,
            observed_rtp_bps = tally.observed_rtp_bps,
            target_rtp_bps = tally.target_rtp_bps,
            "payout summary"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::parse_from(["simulator"]);
        let config = build_config(&args).expect("config should parse");
        assert_eq!(config.shots, 1_000_000);
        assert_eq!(config.cost, 1_000);
        assert_eq!(config.tier, Tier::Large);
        assert!(config.spread.is_none());
    }

    #[test]
    fn parses_tier_names_case_insensitively() {
        for (name, tier) in [("boss", Tier::Boss), ("SMALL", Tier::Small)] {
            let args = Args::parse_from(["simulator", "--tier", name]);
            assert_eq!(build_config(&args).unwrap().tier, tier);
        }
    }

    #[test]
    fn rejects_zero_shots() {
        let args = Args::parse_from(["simulator", "--shots", "0"]);
        let err = build_config(&args).unwrap_err();
        assert!(err.to_string().contains("shots"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_unknown_tier() {
        let args = Args::parse_from(["simulator", "--tier", "kraken"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn rejects_unknown_weapon() {
        let args = Args::parse_from(["simulator", "--spread", "4", "--weapon", "railgun"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn single_run_tallies_every_shot() {
        let args = Args::parse_from(["simulator", "--shots", "500", "--tier", "small"]);
        let config = build_config(&args).expect("config should parse");
        let mut tally = run_single(&config);
        tally.finalize(9_600);
        assert_eq!(tally.shots, 500);
        assert_eq!(tally.total_cost, 500 * 1_000);
        assert!(tally.kills > 0);
        assert_eq!(
            tally.kills,
            tally.hard_pity_kills + tally.probability_kills
        );
    }

    #[test]
    fn spread_run_conserves_volley_cost() {
        let args = Args::parse_from([
            "simulator", "--shots", "200", "--spread", "4", "--cost", "4000",
        ]);
        let config = build_config(&args).expect("config should parse");
        let tally = run_spread(&config, 4);
        assert_eq!(tally.shots, 200);
        assert_eq!(tally.total_cost, 200 * 4_000);
    }
}
