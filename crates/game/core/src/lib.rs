//! Deterministic server-side action pipeline for a cooperative boss fight.
//!
//! `boss-room-core` holds the canonical rules: data-driven action
//! definitions, pooled action instances, the per-actor sequencer, NPC brains
//! and the world state they act on. It performs no I/O; the runtime drives
//! [`engine::GameEngine`] at a fixed rate and forwards what each tick
//! produced.
pub mod action;
pub mod ai;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    ActionDefinition, ActionEffect, ActionEvent, ActionId, ActionLogic, ActionPool,
    ActionRegistry, ActionRegistryBuilder, ActionRequestData, BlockingMode, BuffableValue,
    GameplayActivity, PoolError, ProjectileInfo, RegistryError, ServerActionPlayer, WireError,
};
pub use ai::{AiBrain, AiStateKind};
pub use config::GameConfig;
pub use engine::{
    ClientRequest, GameEngine, GameEngineBuilder, SpawnError, SpawnRequest, TickReport,
};
pub use env::{
    CharacterClass, ClassCatalog, ClassId, ClassOracle, Env, NaiveSpatialOracle, OracleError,
    PcgRng, RngOracle, SpatialOracle,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use state::{
    ActorId, ActorState, ActorTraits, HitPoints, LifeState, MovementState, ReplicatedActor,
    ReplicatedFields, ReplicationDelta, SimTime, StateError, Vec3, World,
};
