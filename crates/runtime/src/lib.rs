//! Runtime orchestration for the authoritative boss-room simulation.
//!
//! This crate is the replication/request boundary around
//! [`boss_room_core::GameEngine`]. Hosts embed [`Runtime`] to start the
//! simulation worker, send requests through [`RuntimeHandle`], and receive
//! per-tick results on the topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`snapshot`] captures and persists replicated world state
//! - `workers` keeps the simulation task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod snapshot;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, PresentationEvent, ReplicationEvent, TickEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use snapshot::{SnapshotStore, WorldSnapshot};
