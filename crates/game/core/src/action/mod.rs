//! Action domain - data-driven abilities and their sequencer.
//!
//! # Module Structure
//!
//! - `types`: static action data (`ActionDefinition`, `ActionLogic`, buffs)
//! - `registry`: validated catalog of definitions and prototype roles
//! - `request`: client intent (`ActionRequestData`) and its wire form
//! - `instance` / `pool`: recycled per-play runtime state
//! - `logic`: one behavior per `ActionLogic`
//! - `player`: per-actor queue of blocking and non-blocking actions
//! - `context`: what a running action may read and touch

pub mod context;
pub mod error;
pub mod instance;
pub mod logic;
pub mod player;
pub mod pool;
pub mod registry;
pub mod request;
pub mod types;
pub mod wire;

pub use context::{
    ActionContext, ActionEffect, ActionEvent, ActionRun, Collision, ContactProbe, InstanceView,
    Outbox,
};
pub use error::{PoolError, RegistryError, WireError};
pub use instance::{ActionInstance, InstancePhase};
pub use logic::{ActionBehavior, LogicState};
pub use player::ServerActionPlayer;
pub use pool::ActionPool;
pub use registry::{ActionRegistry, ActionRegistryBuilder};
pub use request::ActionRequestData;
pub use types::{
    ActionDefinition, ActionId, ActionLogic, BlockingMode, BuffableValue, GameplayActivity,
    ProjectileInfo,
};
pub use wire::PackFlags;
