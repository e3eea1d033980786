use super::ActionBehavior;
use crate::action::{ActionEffect, ActionRun};
use crate::state::LifeState;

/// Brings a fainted ally back on its feet at exec time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviveLogic {
    executed: bool,
}

impl ActionBehavior for ReviveLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let Some(target) = run.data.first_target() else {
            return false;
        };
        run.face_actor(target)
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if self.executed || !run.reached_exec() {
            return true;
        }
        self.executed = true;
        let Some(target) = run.data.first_target() else {
            return false;
        };
        let fainted = run
            .cx
            .world
            .actor(target)
            .is_some_and(|a| a.life_state == LifeState::Fainted);
        if !fainted {
            return false;
        }
        let hit_points = run.def.amount;
        let source = run.actor();
        run.effect(ActionEffect::Revive {
            source,
            target,
            hit_points,
        });
        true
    }
}
