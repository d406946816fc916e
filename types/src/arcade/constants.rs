/// Fixed-point scale for RTP fractions (basis points, 1.0 = 10_000).
pub const RTP_SCALE: u64 = 10_000;

/// Fixed-point scale for kill probabilities.
///
/// `HouseRng::draw` returns a uniform value in `[0, PROB_SCALE)`; a roll
/// succeeds when the drawn value is strictly below the computed probability.
pub const PROB_SCALE: u64 = 1_000_000;

/// Fixed-point denominator for multi-target weight splits.
///
/// Normalized weights of one fire event always sum to exactly this value.
pub const WEIGHT_SCALE: u64 = 10_000;

/// Maximum simultaneous targets for an area (splash) weapon.
pub const AREA_MAX_TARGETS: usize = 8;

/// Maximum simultaneous targets for a beam (pierce) weapon.
pub const BEAM_MAX_TARGETS: usize = 6;

/// Maximum length of a kill event identifier (UUID v4 is 36 bytes).
pub const MAX_KILL_EVENT_ID_LENGTH: usize = 64;

/// Upper clamp on a single fire event's cost.
///
/// The caller authorizes cost against the player balance before the engine
/// sees it, but the engine still clamps deterministically so adversarial
/// values cannot overflow the fixed-point arithmetic.
pub const MAX_SHOT_COST: u64 = 1_000_000_000;

/// Maximum candidates accepted per multi-hit call before truncation.
///
/// A bound on adversarial input size, not a gameplay cap; the per-weapon cap
/// is applied after this.
pub const MAX_HIT_CANDIDATES: usize = 64;
