use strum::IntoEnumIterator;

use super::{AiState, AttackState, IdleState};
use crate::action::{ActionContext, ServerActionPlayer};
use crate::env::{CharacterClass, SkillSet};
use crate::state::{ActorId, World};

/// Brain states, declared in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiStateKind {
    Attack,
    #[default]
    Idle,
}

/// What a brain knows, shared by all of its states.
#[derive(Clone, Debug, PartialEq)]
pub struct BrainMemory {
    actor: ActorId,
    detect_range: f32,
    skills: SkillSet,
    hated: Vec<ActorId>,
}

impl BrainMemory {
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn detect_range(&self) -> f32 {
        self.detect_range
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    /// Adds `foe` to the hate list unless it is already there.
    pub fn hate(&mut self, foe: ActorId) {
        if !self.hated.contains(&foe) {
            self.hated.push(foe);
        }
    }

    /// Player characters that are up and visible.
    pub fn is_appropriate_foe(world: &World, foe: Option<ActorId>) -> bool {
        foe.and_then(|id| world.actor(id)).is_some_and(|a| {
            !a.is_npc() && a.is_character() && a.is_alive() && !a.is_stealthy
        })
    }

    /// Hate list with inappropriate foes pruned, in the order they were hated.
    pub fn hated_enemies(&mut self, world: &World) -> &[ActorId] {
        self.hated
            .retain(|id| Self::is_appropriate_foe(world, Some(*id)));
        &self.hated
    }

    /// Nearest hated enemy. Ties go to whoever was hated first.
    pub fn choose_foe(&mut self, world: &World) -> Option<ActorId> {
        let me = world.position(self.actor)?;
        let mut closest = None;
        let mut closest_distance = f32::MAX;
        for &foe in self.hated_enemies(world) {
            let Some(there) = world.position(foe) else {
                continue;
            };
            let distance = me.distance_squared(there);
            if distance < closest_distance {
                closest_distance = distance;
                closest = Some(foe);
            }
        }
        closest
    }
}

/// Decision maker for one NPC.
#[derive(Clone, Debug)]
pub struct AiBrain {
    memory: BrainMemory,
    current: AiStateKind,
    idle: IdleState,
    attack: AttackState,
}

impl AiBrain {
    pub fn new(actor: ActorId, class: &CharacterClass) -> Self {
        Self {
            memory: BrainMemory {
                actor,
                detect_range: class.detect_range,
                skills: class.skills.clone(),
                hated: Vec::new(),
            },
            current: AiStateKind::Idle,
            idle: IdleState,
            attack: AttackState::default(),
        }
    }

    /// Replaces the class detect range, e.g. for a boss that sees everyone.
    pub fn with_detect_range(mut self, detect_range: f32) -> Self {
        self.memory.detect_range = detect_range;
        self
    }

    pub fn actor(&self) -> ActorId {
        self.memory.actor
    }

    pub fn current_state(&self) -> AiStateKind {
        self.current
    }

    pub fn hated(&self) -> &[ActorId] {
        &self.memory.hated
    }

    pub fn hate(&mut self, foe: ActorId) {
        self.memory.hate(foe);
    }

    /// Whoever damages this brain's actor becomes hated.
    pub fn receive_hp(&mut self, inflicter: Option<ActorId>, amount: i32) {
        if let Some(inflicter) = inflicter
            && amount < 0
        {
            self.hate(inflicter);
        }
    }

    pub fn update(&mut self, player: &mut ServerActionPlayer, cx: &mut ActionContext<'_>) {
        let next = self.find_best_eligible_state(cx);
        if next != self.current {
            tracing::debug!(actor = %self.memory.actor, from = %self.current, to = %next, "brain state change");
            let (state, memory) = self.state_mut(next);
            state.initialize(memory, player, cx);
        }
        self.current = next;
        let (state, memory) = self.state_mut(next);
        state.update(memory, player, cx);
    }

    fn find_best_eligible_state(&mut self, cx: &ActionContext<'_>) -> AiStateKind {
        for kind in AiStateKind::iter() {
            let (state, memory) = self.state_mut(kind);
            if state.is_eligible(memory, cx) {
                return kind;
            }
        }
        tracing::warn!(actor = %self.memory.actor, "no brain state is eligible");
        AiStateKind::Idle
    }

    fn state_mut(&mut self, kind: AiStateKind) -> (&mut dyn AiState, &mut BrainMemory) {
        match kind {
            AiStateKind::Attack => (&mut self.attack, &mut self.memory),
            AiStateKind::Idle => (&mut self.idle, &mut self.memory),
        }
    }
}
