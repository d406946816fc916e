//! Injected randomness seam.
//!
//! The engine never owns entropy policy: it consumes exactly one uniform draw
//! per probability roll and mints exactly one id per kill through this trait.
//! Production uses OS entropy; tests and replay tooling substitute seeded or
//! scripted sources (see [`crate::mocks`]).

use rand::rngs::OsRng;
use rand::Rng as _;
use reefshot_types::arcade::PROB_SCALE;
use reefshot_types::KillEventId;
use uuid::Uuid;

/// Randomness source for hit resolution.
pub trait HouseRng {
    /// One uniform draw in `[0, PROB_SCALE)`.
    fn draw(&mut self) -> u64;

    /// Mint a fresh, globally unique kill event identifier.
    ///
    /// Never derived from call inputs: a replayed hit cannot regenerate the
    /// id of a payout that already happened.
    fn next_kill_id(&mut self) -> KillEventId;
}

/// Production randomness: OS entropy draws and UUID v4 kill ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng;

impl HouseRng for SecureRng {
    fn draw(&mut self) -> u64 {
        OsRng.gen_range(0..PROB_SCALE)
    }

    fn next_kill_id(&mut self) -> KillEventId {
        KillEventId(Uuid::new_v4().to_string())
    }
}
