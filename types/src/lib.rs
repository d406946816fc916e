//! Common types for the reefshot economy.
//!
//! Everything here is plain data plus its wire codec: tier configuration,
//! per-target accounting state, hit candidates, and resolution outcomes. The
//! hit-resolution logic itself lives in `reefshot-execution`.

pub mod arcade;

pub use arcade::{
    HitCandidate, KillEventId, Outcome, OutcomeReason, PlayerId, TargetId, TargetState, Tier,
    TierConfig, TierInvariantError, TierRegistry, WeaponClass,
};
