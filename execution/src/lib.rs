//! Reefshot hit-resolution engine.
//!
//! This crate decides, per shot, whether a target dies and what it pays out,
//! holding every player/tier pair to its configured long-run RTP. The engine
//! is the only writer of per-target accounting state; callers feed it
//! authorized shot costs and collision candidate lists and evict state on
//! kill, despawn, and disconnect.
//!
//! ## Determinism requirements
//! - No floating point anywhere; all arithmetic is integer fixed-point with
//!   truncating division.
//! - No wall-clock time inside resolution.
//! - The only randomness is the injected [`HouseRng`]: exactly one `draw` per
//!   probability roll and one minted id per kill, so a seeded source replays
//!   an identical decision sequence.
//!
//! ## Conservation invariants
//! When one fire event is split across up to eight targets, normalized
//! weights sum to exactly `WEIGHT_SCALE` and cost/budget shares sum to
//! exactly their totals: all rounding error is absorbed by the final slot
//! (the remainder-to-last rule in [`spread`]).

pub mod engine;
pub mod ledger;
pub mod rng;
pub mod spread;

mod room;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use engine::HitEngine;
pub use ledger::TargetLedger;
pub use rng::{HouseRng, SecureRng};
pub use room::{RoomActor, RoomError, RoomMailbox};

#[cfg(test)]
mod conservation_tests;
#[cfg(test)]
mod idempotency_tests;
