//! Deterministic test doubles for the randomness seam.
//!
//! Replay and audit tooling substitutes these for [`crate::SecureRng`]: a
//! seeded ChaCha source for statistical runs and a scripted source for
//! exact-path tests.

use crate::rng::HouseRng;
use rand::{Rng as _, SeedableRng as _};
use rand_chacha::ChaCha20Rng;
use reefshot_types::arcade::PROB_SCALE;
use reefshot_types::KillEventId;
use std::collections::VecDeque;

/// Seeded randomness: reproducible draws and sequentially minted kill ids.
pub struct SeededRng {
    rng: ChaCha20Rng,
    minted: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            minted: 0,
        }
    }
}

impl HouseRng for SeededRng {
    fn draw(&mut self) -> u64 {
        self.rng.gen_range(0..PROB_SCALE)
    }

    fn next_kill_id(&mut self) -> KillEventId {
        self.minted += 1;
        KillEventId(format!("seeded-{:016x}", self.minted))
    }
}

/// Scripted randomness: draws pop from a fixed script, then fall back to a
/// default value once the script is exhausted.
pub struct FixedRng {
    draws: VecDeque<u64>,
    fallback: u64,
    minted: u64,
}

impl FixedRng {
    /// Every draw returns `value`.
    pub fn always(value: u64) -> Self {
        Self {
            draws: VecDeque::new(),
            fallback: value,
            minted: 0,
        }
    }

    /// Draws follow `script`, then return `fallback`.
    pub fn script(script: Vec<u64>, fallback: u64) -> Self {
        Self {
            draws: script.into(),
            fallback,
            minted: 0,
        }
    }

    /// A source that never rolls a kill: every draw is the maximum value.
    pub fn never_kills() -> Self {
        Self::always(PROB_SCALE - 1)
    }

    /// A source that rolls a kill whenever the probability is nonzero.
    pub fn always_kills() -> Self {
        Self::always(0)
    }
}

impl HouseRng for FixedRng {
    fn draw(&mut self) -> u64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }

    fn next_kill_id(&mut self) -> KillEventId {
        self.minted += 1;
        KillEventId(format!("fixed-{:016x}", self.minted))
    }
}
