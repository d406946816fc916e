use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error as ThisError;

use super::RTP_SCALE;

/// Target tier identifiers.
///
/// Tiers order targets by payout size; every tier maps to exactly one
/// [`TierConfig`] in the [`TierRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tier {
    Small = 0,
    Medium = 1,
    Large = 2,
    Elite = 3,
    Boss = 4,
}

impl Write for Tier {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Tier {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Small),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Large),
            3 => Ok(Self::Elite),
            4 => Ok(Self::Boss),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Tier {
    const SIZE: usize = 1;
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum TierInvariantError {
    #[error("rtp_bps out of range (got={got}, max={max})")]
    RtpOutOfRange { got: u32, max: u64 },
    #[error("pity_threshold must be positive")]
    ZeroPityThreshold,
    #[error("reward must be positive")]
    ZeroReward,
}

/// Economy parameters for one target tier.
///
/// All three values come only from the tier table; no code path may derive
/// them from other inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Target long-run return-to-player fraction, in basis points of
    /// [`RTP_SCALE`].
    pub rtp_bps: u32,
    /// Cumulative spent cost at which a kill becomes mandatory.
    pub pity_threshold: u64,
    /// Fixed payout amount in chips.
    pub reward: u64,
}

impl TierConfig {
    pub fn validate_invariants(&self) -> Result<(), TierInvariantError> {
        if self.rtp_bps == 0 || self.rtp_bps as u64 > RTP_SCALE {
            return Err(TierInvariantError::RtpOutOfRange {
                got: self.rtp_bps,
                max: RTP_SCALE,
            });
        }
        if self.pity_threshold == 0 {
            return Err(TierInvariantError::ZeroPityThreshold);
        }
        if self.reward == 0 {
            return Err(TierInvariantError::ZeroReward);
        }
        Ok(())
    }
}

impl Write for TierConfig {
    fn write(&self, writer: &mut impl BufMut) {
        self.rtp_bps.write(writer);
        self.pity_threshold.write(writer);
        self.reward.write(writer);
    }
}

impl Read for TierConfig {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            rtp_bps: u32::read(reader)?,
            pity_threshold: u64::read(reader)?,
            reward: u64::read(reader)?,
        })
    }
}

impl EncodeSize for TierConfig {
    fn encode_size(&self) -> usize {
        self.rtp_bps.encode_size() + self.pity_threshold.encode_size() + self.reward.encode_size()
    }
}

#[derive(Debug, ThisError)]
pub enum TierTableError {
    #[error("failed to parse tier table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tier {tier:?} is invalid: {source}")]
    Invalid {
        tier: Tier,
        source: TierInvariantError,
    },
    #[error("tier {0:?} appears more than once")]
    Duplicate(Tier),
}

/// One row of an external tier table override.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TierTableEntry {
    pub tier: Tier,
    #[serde(flatten)]
    pub config: TierConfig,
}

/// Immutable tier configuration table.
///
/// Built once at startup from compiled-in defaults or a JSON override and
/// never mutated afterwards. Unknown tiers are impossible by type, but a
/// registry built from JSON may omit tiers; lookups then return `None` and
/// the engine reports `invalid_tier` instead of resolving the hit.
#[derive(Clone, Debug)]
pub struct TierRegistry {
    configs: HashMap<Tier, TierConfig>,
}

impl TierRegistry {
    /// Production tier table.
    pub fn production() -> Self {
        let configs = HashMap::from([
            (
                Tier::Small,
                TierConfig {
                    rtp_bps: 9_600,
                    pity_threshold: 250,
                    reward: 200,
                },
            ),
            (
                Tier::Medium,
                TierConfig {
                    rtp_bps: 9_500,
                    pity_threshold: 1_250,
                    reward: 1_000,
                },
            ),
            (
                Tier::Large,
                TierConfig {
                    rtp_bps: 9_000,
                    pity_threshold: 6_000,
                    reward: 4_500,
                },
            ),
            (
                Tier::Elite,
                TierConfig {
                    rtp_bps: 8_800,
                    pity_threshold: 30_000,
                    reward: 20_000,
                },
            ),
            (
                Tier::Boss,
                TierConfig {
                    rtp_bps: 8_500,
                    pity_threshold: 160_000,
                    reward: 100_000,
                },
            ),
        ]);
        Self { configs }
    }

    /// Build a registry from a JSON array of [`TierTableEntry`] rows.
    ///
    /// Every row is validated; duplicate tiers are rejected so an override
    /// file cannot silently shadow itself.
    pub fn from_json(raw: &str) -> Result<Self, TierTableError> {
        let entries: Vec<TierTableEntry> = serde_json::from_str(raw)?;
        let mut configs = HashMap::with_capacity(entries.len());
        for entry in entries {
            entry
                .config
                .validate_invariants()
                .map_err(|source| TierTableError::Invalid {
                    tier: entry.tier,
                    source,
                })?;
            if configs.insert(entry.tier, entry.config).is_some() {
                return Err(TierTableError::Duplicate(entry.tier));
            }
        }
        Ok(Self { configs })
    }

    pub fn get(&self, tier: Tier) -> Option<&TierConfig> {
        self.configs.get(&tier)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl Default for TierRegistry {
    fn default() -> Self {
        Self::production()
    }
}
