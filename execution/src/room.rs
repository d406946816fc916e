//! Per-room serialization of engine calls.
//!
//! The engine requires that no two calls touching the same (player, target)
//! pair interleave. Rather than lock individual keys (a multi-target call
//! touches up to eight at once), each game room runs one actor that owns its
//! engine outright and drains a mailbox of commands one at a time, so every
//! call is a complete critical section by construction.

use crate::engine::HitEngine;
use crate::rng::HouseRng;
use reefshot_types::arcade::MAX_HIT_CANDIDATES;
use reefshot_types::{HitCandidate, Outcome, PlayerId, TargetId, TargetState, Tier, WeaponClass};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room actor closed")]
    Closed,
}

enum Command {
    ResolveSingle {
        player: PlayerId,
        target: TargetId,
        cost: u64,
        tier: Tier,
        reply: oneshot::Sender<Outcome>,
    },
    ResolveMulti {
        player: PlayerId,
        hits: Vec<HitCandidate>,
        cost: u64,
        weapon: WeaponClass,
        reply: oneshot::Sender<Vec<Outcome>>,
    },
    GetState {
        player: PlayerId,
        target: TargetId,
        reply: oneshot::Sender<Option<TargetState>>,
    },
    EvictTarget {
        target: TargetId,
        reply: oneshot::Sender<usize>,
    },
    EvictPlayer {
        player: PlayerId,
        reply: oneshot::Sender<usize>,
    },
    TrackedStates {
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable handle for submitting engine calls to a room.
#[derive(Clone)]
pub struct RoomMailbox {
    sender: mpsc::Sender<Command>,
}

impl RoomMailbox {
    async fn send<T>(
        &self,
        command: Command,
        receiver: oneshot::Receiver<T>,
    ) -> Result<T, RoomError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| RoomError::Closed)?;
        receiver.await.map_err(|_| RoomError::Closed)
    }

    pub async fn resolve_single_hit(
        &self,
        player: PlayerId,
        target: TargetId,
        cost: u64,
        tier: Tier,
    ) -> Result<Outcome, RoomError> {
        let (reply, receiver) = oneshot::channel();
        self.send(
            Command::ResolveSingle {
                player,
                target,
                cost,
                tier,
                reply,
            },
            receiver,
        )
        .await
    }

    pub async fn resolve_multi_hit(
        &self,
        player: PlayerId,
        mut hits: Vec<HitCandidate>,
        cost: u64,
        weapon: WeaponClass,
    ) -> Result<Vec<Outcome>, RoomError> {
        // Bound adversarial list length before it ever crosses the channel;
        // the engine applies the per-weapon cap after this.
        hits.truncate(MAX_HIT_CANDIDATES);
        let (reply, receiver) = oneshot::channel();
        self.send(
            Command::ResolveMulti {
                player,
                hits,
                cost,
                weapon,
                reply,
            },
            receiver,
        )
        .await
    }

    pub async fn get_state(
        &self,
        player: PlayerId,
        target: TargetId,
    ) -> Result<Option<TargetState>, RoomError> {
        let (reply, receiver) = oneshot::channel();
        self.send(
            Command::GetState {
                player,
                target,
                reply,
            },
            receiver,
        )
        .await
    }

    pub async fn evict_by_target(&self, target: TargetId) -> Result<usize, RoomError> {
        let (reply, receiver) = oneshot::channel();
        self.send(Command::EvictTarget { target, reply }, receiver)
            .await
    }

    pub async fn evict_by_player(&self, player: PlayerId) -> Result<usize, RoomError> {
        let (reply, receiver) = oneshot::channel();
        self.send(Command::EvictPlayer { player, reply }, receiver)
            .await
    }

    pub async fn tracked_states(&self) -> Result<usize, RoomError> {
        let (reply, receiver) = oneshot::channel();
        self.send(Command::TrackedStates { reply }, receiver).await
    }
}

/// Actor owning one room's engine.
pub struct RoomActor<R: HouseRng> {
    engine: HitEngine<R>,
    receiver: mpsc::Receiver<Command>,
}

impl<R: HouseRng + Send + 'static> RoomActor<R> {
    /// Spawn the actor onto the current tokio runtime.
    ///
    /// The actor exits when every mailbox clone is dropped.
    pub fn spawn(engine: HitEngine<R>, mailbox_capacity: usize) -> RoomMailbox {
        let (sender, receiver) = mpsc::channel(mailbox_capacity);
        let actor = Self { engine, receiver };
        tokio::spawn(actor.run());
        RoomMailbox { sender }
    }

    async fn run(mut self) {
        info!("room actor started");
        while let Some(command) = self.receiver.recv().await {
            self.handle(command);
        }
        if self.engine.tracked_states() > 0 {
            warn!(
                tracked = self.engine.tracked_states(),
                "room actor closing with live target state"
            );
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::ResolveSingle {
                player,
                target,
                cost,
                tier,
                reply,
            } => {
                let _ = reply.send(self.engine.resolve_single_hit(player, target, cost, tier));
            }
            Command::ResolveMulti {
                player,
                hits,
                cost,
                weapon,
                reply,
            } => {
                let _ = reply.send(self.engine.resolve_multi_hit(player, &hits, cost, weapon));
            }
            Command::GetState {
                player,
                target,
                reply,
            } => {
                let _ = reply.send(self.engine.get_state(player, target));
            }
            Command::EvictTarget { target, reply } => {
                let _ = reply.send(self.engine.evict_by_target(target));
            }
            Command::EvictPlayer { player, reply } => {
                let _ = reply.send(self.engine.evict_by_player(player));
            }
            Command::TrackedStates { reply } => {
                let _ = reply.send(self.engine.tracked_states());
            }
        }
    }
}
