//! Event payloads for each topic.

use serde::{Deserialize, Serialize};

use boss_room_core::{ActionEvent, ActorId, ReplicationDelta, SimTime};

/// One replicated change, stamped with the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationEvent {
    pub tick: u64,
    pub delta: ReplicationDelta,
}

impl ReplicationEvent {
    pub fn actor(&self) -> ActorId {
        self.delta.actor()
    }
}

/// A presentation cue (action started, ended, cancelled, projectile launched).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationEvent {
    pub tick: u64,
    pub event: ActionEvent,
}

/// Lightweight tick boundary marker, published after the tick's other events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    pub tick: u64,
    pub now: SimTime,
    pub deltas: usize,
    pub events: usize,
}
