use super::{AiState, BrainMemory};
use crate::action::{ActionContext, ServerActionPlayer};

/// Stands around and hates any player character that wanders into range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IdleState;

impl AiState for IdleState {
    fn is_eligible(&mut self, memory: &mut BrainMemory, cx: &ActionContext<'_>) -> bool {
        memory.hated_enemies(cx.world).is_empty()
    }

    fn initialize(
        &mut self,
        _memory: &mut BrainMemory,
        player: &mut ServerActionPlayer,
        cx: &mut ActionContext<'_>,
    ) {
        player.clear_actions(false, cx);
    }

    fn update(
        &mut self,
        memory: &mut BrainMemory,
        _player: &mut ServerActionPlayer,
        cx: &mut ActionContext<'_>,
    ) {
        let Some(position) = cx.world.position(memory.actor()) else {
            return;
        };
        let range_sq = memory.detect_range() * memory.detect_range();
        let spotted: Vec<_> = cx
            .world
            .actors()
            .filter(|a| BrainMemory::is_appropriate_foe(cx.world, Some(a.id)))
            .filter(|a| a.position.distance_squared(position) <= range_sq)
            .map(|a| a.id)
            .collect();
        for foe in spotted {
            memory.hate(foe);
        }
    }
}
