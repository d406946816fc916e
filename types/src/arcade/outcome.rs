use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

use super::{KillEventId, TargetId, TargetState};

/// Why a hit resolved the way it did.
///
/// Consumed downstream by the audit-receipt and anti-cheat collaborators, so
/// the discriminants are part of the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutcomeReason {
    /// Killed: accumulated cost crossed the pity threshold (or a latched
    /// promise was honored) with the budget able to cover the reward.
    HardPity = 0,
    /// Killed: the random roll fell below the computed probability.
    Probability = 1,
    /// Survived: the roll did not fall below the probability.
    RollFailed = 2,
    /// Survived: the budget cannot cover the reward yet.
    BudgetGate = 3,
    /// No-op: the target was already killed by this player and awaits
    /// eviction.
    AlreadyKilled = 4,
    /// No-op: the supplied tier has no configuration.
    InvalidTier = 5,
}

impl Write for OutcomeReason {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for OutcomeReason {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::HardPity),
            1 => Ok(Self::Probability),
            2 => Ok(Self::RollFailed),
            3 => Ok(Self::BudgetGate),
            4 => Ok(Self::AlreadyKilled),
            5 => Ok(Self::InvalidTier),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for OutcomeReason {
    const SIZE: usize = 1;
}

/// Result of resolving one hit against one target.
///
/// Transient: returned to the caller and handed to the audit pipeline, never
/// persisted by the engine itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub target: TargetId,
    pub kill: bool,
    pub reason: OutcomeReason,
    /// Fresh unique identifier, present exactly when `kill` is true.
    pub kill_event_id: Option<KillEventId>,
    /// Payout amount in chips, present exactly when `kill` is true.
    pub reward: Option<u64>,
    /// Snapshot of the post-update state for observability. Absent for
    /// `invalid_tier`, which touches no state.
    pub state: Option<TargetState>,
}

impl Outcome {
    /// A non-kill outcome with a post-update state snapshot.
    pub fn survived(target: TargetId, reason: OutcomeReason, state: TargetState) -> Self {
        Self {
            target,
            kill: false,
            reason,
            kill_event_id: None,
            reward: None,
            state: Some(state),
        }
    }

    /// A structured rejection that touched no state.
    pub fn rejected(target: TargetId, reason: OutcomeReason) -> Self {
        Self {
            target,
            kill: false,
            reason,
            kill_event_id: None,
            reward: None,
            state: None,
        }
    }

    /// A kill outcome with its minted event id and payout.
    pub fn killed(
        target: TargetId,
        reason: OutcomeReason,
        kill_event_id: KillEventId,
        reward: u64,
        state: TargetState,
    ) -> Self {
        Self {
            target,
            kill: true,
            reason,
            kill_event_id: Some(kill_event_id),
            reward: Some(reward),
            state: Some(state),
        }
    }
}

impl Write for Outcome {
    fn write(&self, writer: &mut impl BufMut) {
        self.target.write(writer);
        self.kill.write(writer);
        self.reason.write(writer);
        self.kill_event_id.write(writer);
        self.reward.write(writer);
        self.state.write(writer);
    }
}

impl Read for Outcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            target: TargetId::read(reader)?,
            kill: bool::read(reader)?,
            reason: OutcomeReason::read(reader)?,
            kill_event_id: Option::<KillEventId>::read(reader)?,
            reward: Option::<u64>::read(reader)?,
            state: Option::<TargetState>::read(reader)?,
        })
    }
}

impl EncodeSize for Outcome {
    fn encode_size(&self) -> usize {
        self.target.encode_size()
            + self.kill.encode_size()
            + self.reason.encode_size()
            + self.kill_event_id.encode_size()
            + self.reward.encode_size()
            + self.state.encode_size()
    }
}
