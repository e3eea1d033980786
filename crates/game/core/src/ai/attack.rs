use super::{AiState, BrainMemory};
use crate::action::{ActionContext, ActionId, ActionRequestData, ServerActionPlayer};
use crate::env::{compute_seed, roll};
use crate::state::ActorId;

/// Chases and hits the nearest hated enemy with a randomly picked skill.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackState {
    foe: Option<ActorId>,
    current_attack: Option<ActionId>,
}

impl AttackState {
    pub fn foe(&self) -> Option<ActorId> {
        self.foe
    }

    pub fn current_attack(&self) -> Option<ActionId> {
        self.current_attack
    }

    fn roll(memory: &BrainMemory, cx: &ActionContext<'_>, context: u32, len: usize) -> usize {
        let seed = compute_seed(cx.env.config.game_seed, cx.tick, memory.actor().0, context);
        cx.env.rng.index(seed, len)
    }

    /// A random skill among those off cooldown.
    fn choose_attack(
        memory: &BrainMemory,
        player: &ServerActionPlayer,
        cx: &ActionContext<'_>,
    ) -> Option<ActionId> {
        let usable: Vec<ActionId> = memory
            .skills()
            .iter()
            .copied()
            .filter(|id| player.is_reuse_time_elapsed(*id, cx.now, cx.actions()))
            .collect();
        if usable.is_empty() {
            return None;
        }
        let index = Self::roll(memory, cx, roll::AI_CHOOSE_ATTACK, usable.len());
        usable.get(index).copied()
    }

    /// True when the head already works on `foe`, or the actor is stunned.
    fn busy_with(&self, foe: ActorId, player: &ServerActionPlayer, cx: &ActionContext<'_>) -> bool {
        let Some(info) = player.active_action_info() else {
            return false;
        };
        let actions = cx.actions();
        let on_foe = info.first_target() == Some(foe);
        (on_foe && info.action_id == actions.general_chase())
            || (on_foe && Some(info.action_id) == self.current_attack)
            || Some(info.action_id) == actions.stun()
    }
}

impl AiState for AttackState {
    fn is_eligible(&mut self, memory: &mut BrainMemory, cx: &ActionContext<'_>) -> bool {
        self.foe.is_some() || memory.choose_foe(cx.world).is_some()
    }

    fn initialize(
        &mut self,
        memory: &mut BrainMemory,
        _player: &mut ServerActionPlayer,
        cx: &mut ActionContext<'_>,
    ) {
        let skills = memory.skills();
        self.current_attack = if skills.is_empty() {
            None
        } else {
            let index = Self::roll(memory, cx, roll::AI_OPENING_ATTACK, skills.len());
            skills.get(index).copied()
        };
        self.foe = None;
    }

    fn update(
        &mut self,
        memory: &mut BrainMemory,
        player: &mut ServerActionPlayer,
        cx: &mut ActionContext<'_>,
    ) {
        if !BrainMemory::is_appropriate_foe(cx.world, self.foe) {
            self.foe = memory.choose_foe(cx.world);
            player.clear_actions(true, cx);
        }
        let Some(foe) = self.foe else {
            return;
        };
        if self.busy_with(foe, player, cx) {
            return;
        }

        self.current_attack = Self::choose_attack(memory, player, cx);
        let Some(attack) = self.current_attack else {
            return;
        };
        let forward = cx.me().map(|me| me.forward).unwrap_or_default();
        let request = ActionRequestData::new(attack)
            .with_target(foe)
            .with_direction(forward)
            .closing();
        tracing::debug!(actor = %memory.actor(), %foe, %attack, "brain attacks");
        player.play_action(request, cx);
    }
}
