//! Replication deltas produced by the world after each tick.
//!
//! The world marks [`ReplicatedFields`] as setters change values; the engine
//! drains them once per tick into [`ReplicationDelta`] records that the
//! runtime forwards to peers.
mod bitmask;

pub use bitmask::ReplicatedFields;

use crate::action::ActionRequestData;
use crate::state::{ActorId, ActorState, HitPoints, LifeState, Vec3};

/// Peer-visible subset of an actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicatedActor {
    pub id: ActorId,
    pub hit_points: HitPoints,
    pub life_state: LifeState,
    pub is_stealthy: bool,
    pub target: Option<ActorId>,
    pub held_object: Option<ActorId>,
    pub position: Vec3,
    pub active_action: Option<ActionRequestData>,
}

impl From<&ActorState> for ReplicatedActor {
    fn from(actor: &ActorState) -> Self {
        Self {
            id: actor.id,
            hit_points: actor.hit_points,
            life_state: actor.life_state,
            is_stealthy: actor.is_stealthy,
            target: actor.target,
            held_object: actor.held_object,
            position: actor.position,
            active_action: actor.active_action.clone(),
        }
    }
}

/// One replicated change set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReplicationDelta {
    Spawned(ReplicatedActor),
    Changed {
        changed: ReplicatedFields,
        state: ReplicatedActor,
    },
    Despawned(ActorId),
}

impl ReplicationDelta {
    pub fn actor(&self) -> ActorId {
        match self {
            Self::Spawned(state) | Self::Changed { state, .. } => state.id,
            Self::Despawned(id) => *id,
        }
    }
}
