//! Server-side brains for NPC characters.
//!
//! A brain keeps a hate list and a small set of states checked in priority
//! order each tick. The first eligible state runs; switching states runs the
//! new state's `initialize` first. Brains never touch the world directly:
//! everything they do goes through their actor's
//! [`ServerActionPlayer`](crate::action::ServerActionPlayer).

mod attack;
mod brain;
mod idle;

pub use attack::AttackState;
pub use brain::{AiBrain, AiStateKind, BrainMemory};
pub use idle::IdleState;

use crate::action::{ActionContext, ServerActionPlayer};

/// One behavior a brain can be in.
pub trait AiState {
    /// Whether this state wants to run this tick.
    fn is_eligible(&mut self, memory: &mut BrainMemory, cx: &ActionContext<'_>) -> bool;

    /// Runs once when the brain switches into this state.
    fn initialize(
        &mut self,
        memory: &mut BrainMemory,
        player: &mut ServerActionPlayer,
        cx: &mut ActionContext<'_>,
    );

    fn update(
        &mut self,
        memory: &mut BrainMemory,
        player: &mut ServerActionPlayer,
        cx: &mut ActionContext<'_>,
    );
}
