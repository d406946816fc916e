//! Per-target accounting state store.
//!
//! One entry per live (player, target) pair, created lazily on first hit and
//! removed only through the two eviction operations. The ledger never prunes
//! itself: the calling layer must evict on every kill, despawn, and player
//! disconnect, or the table grows for the life of the room.

use reefshot_types::{PlayerId, TargetId, TargetState};
use std::collections::HashMap;

/// In-memory table of per-(player, target) accounting state.
#[derive(Debug, Default)]
pub struct TargetLedger {
    states: HashMap<(PlayerId, TargetId), TargetState>,
}

impl TargetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: PlayerId, target: TargetId) -> Option<&TargetState> {
        self.states.get(&(player, target))
    }

    /// Fetch the entry for a pair, creating a zeroed one if absent.
    pub fn get_or_create(&mut self, player: PlayerId, target: TargetId) -> &mut TargetState {
        self.states.entry((player, target)).or_default()
    }

    /// Remove every player's entry for a target (kill or despawn).
    /// Returns the number of entries removed.
    pub fn evict_by_target(&mut self, target: TargetId) -> usize {
        let before = self.states.len();
        self.states.retain(|(_, t), _| *t != target);
        before - self.states.len()
    }

    /// Remove every entry for a player (disconnect).
    /// Returns the number of entries removed.
    pub fn evict_by_player(&mut self, player: PlayerId) -> usize {
        let before = self.states.len();
        self.states.retain(|(p, _), _| *p != player);
        before - self.states.len()
    }

    /// Number of live entries, exposed for leak monitoring.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
