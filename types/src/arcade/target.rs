use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use serde::{Deserialize, Serialize};

use super::{
    read_string, string_encode_size, write_string, Tier, AREA_MAX_TARGETS, BEAM_MAX_TARGETS,
    MAX_KILL_EVENT_ID_LENGTH,
};

/// Connection-scoped player identifier, assigned by the session layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

/// World-scoped target identifier, assigned by the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

macro_rules! impl_id_codec {
    ($name:ident) => {
        impl Write for $name {
            fn write(&self, writer: &mut impl BufMut) {
                self.0.write(writer);
            }
        }

        impl Read for $name {
            type Cfg = ();

            fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
                Ok(Self(u64::read(reader)?))
            }
        }

        impl FixedSize for $name {
            const SIZE: usize = u64::SIZE;
        }
    };
}

impl_id_codec!(PlayerId);
impl_id_codec!(TargetId);

/// Opaque unique identifier minted once per executed kill.
///
/// Never derived from call inputs, so a replayed or retransmitted hit can
/// never regenerate the id of a payout that already happened.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KillEventId(pub String);

impl Write for KillEventId {
    fn write(&self, writer: &mut impl BufMut) {
        write_string(&self.0, writer);
    }
}

impl Read for KillEventId {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self(read_string(reader, MAX_KILL_EVENT_ID_LENGTH)?))
    }
}

impl EncodeSize for KillEventId {
    fn encode_size(&self) -> usize {
        string_encode_size(&self.0)
    }
}

/// Accounting state for one live (player, target) pair.
///
/// Created lazily on the first hit, mutated only by the hit-resolution
/// operations, and removed only by explicit eviction. Once `killed` is set
/// the state is immutable until evicted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TargetState {
    /// Total cost this player has spent on this target. Monotonically
    /// non-decreasing while the state lives.
    pub accumulated_cost: u64,
    /// RTP budget remaining toward the next payout. Signed: a kill may drive
    /// it negative ("controlled debt"), bounded below by `-reward`.
    pub budget: i64,
    /// Hard-pity latch: the threshold was crossed while the budget could not
    /// yet cover the reward. Set once, never cleared while the state lives.
    pub pity_latched: bool,
    /// Terminal flag. Further hits are no-ops until the caller evicts.
    pub killed: bool,
}

impl Write for TargetState {
    fn write(&self, writer: &mut impl BufMut) {
        self.accumulated_cost.write(writer);
        self.budget.write(writer);
        self.pity_latched.write(writer);
        self.killed.write(writer);
    }
}

impl Read for TargetState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            accumulated_cost: u64::read(reader)?,
            budget: i64::read(reader)?,
            pity_latched: bool::read(reader)?,
            killed: bool::read(reader)?,
        })
    }
}

impl EncodeSize for TargetState {
    fn encode_size(&self) -> usize {
        self.accumulated_cost.encode_size()
            + self.budget.encode_size()
            + self.pity_latched.encode_size()
            + self.killed.encode_size()
    }
}

/// One candidate target of a multi-target fire event, as supplied by the
/// collision layer. Not persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitCandidate {
    pub target: TargetId,
    pub tier: Tier,
    /// Geometric rank signal: fixed-point distance for area weapons. Beam
    /// weapons rank by list position, so the field is ignored for them.
    pub rank_signal: u64,
}

impl Write for HitCandidate {
    fn write(&self, writer: &mut impl BufMut) {
        self.target.write(writer);
        self.tier.write(writer);
        self.rank_signal.write(writer);
    }
}

impl Read for HitCandidate {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            target: TargetId::read(reader)?,
            tier: Tier::read(reader)?,
            rank_signal: u64::read(reader)?,
        })
    }
}

impl FixedSize for HitCandidate {
    const SIZE: usize = TargetId::SIZE + Tier::SIZE + u64::SIZE;
}

/// Multi-target weapon classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WeaponClass {
    /// Splash damage around an impact point; closer targets weigh more.
    Area = 0,
    /// Piercing line; front-of-beam targets weigh more.
    Beam = 1,
}

impl WeaponClass {
    /// Maximum simultaneous targets one fire event may affect.
    pub fn cap(&self) -> usize {
        match self {
            Self::Area => AREA_MAX_TARGETS,
            Self::Beam => BEAM_MAX_TARGETS,
        }
    }
}

impl Write for WeaponClass {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for WeaponClass {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Area),
            1 => Ok(Self::Beam),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for WeaponClass {
    const SIZE: usize = 1;
}
