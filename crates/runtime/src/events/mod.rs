//! Topic-based event bus for outbound simulation results.
//!
//! Every tick the simulation worker publishes its replication deltas,
//! presentation cues and a closing tick marker. Consumers subscribe only to
//! the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{PresentationEvent, ReplicationEvent, TickEvent};
