mod actor;
mod common;
mod world;

pub use actor::{ActorState, ActorTraits, LifeState, MovementState, QueryMask};
pub use common::{ActorId, HitPoints, SimClock, SimTime, Vec3};
pub use world::World;
