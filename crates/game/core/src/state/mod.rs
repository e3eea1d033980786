//! Authoritative world state.
//!
//! Actors, their replicated fields, and the fixed-step clock. Only the engine
//! and the action pipeline mutate this state; the runtime reads it through
//! snapshots and the replication deltas drained after every tick.
pub mod delta;
pub mod error;
pub mod types;

pub use delta::{ReplicatedActor, ReplicatedFields, ReplicationDelta};
pub use error::StateError;
pub use types::{
    ActorId, ActorState, ActorTraits, HitPoints, LifeState, MovementState, QueryMask, SimClock,
    SimTime, Vec3, World,
};
