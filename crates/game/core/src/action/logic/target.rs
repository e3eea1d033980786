use super::ActionBehavior;
use crate::action::ActionRun;
use crate::state::{ActorId, LifeState, MovementState};

/// Keeps the owner's replicated target pointed at one actor.
///
/// Starting always clears the previous target first, so an untargeted
/// request is how a target gets cleared. Runs until the target despawns or
/// dies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetLogic {
    current: Option<ActorId>,
}

impl ActionBehavior for TargetLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let actor = run.actor();
        run.cx.world.set_target(actor, None);
        let Some(target) = run.data.first_target() else {
            return false;
        };
        self.current = Some(target);
        run.cx.world.set_target(actor, Some(target));
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let Some(target) = self.current else {
            return false;
        };
        let valid = run
            .cx
            .world
            .actor(target)
            .is_some_and(|a| a.life_state != LifeState::Dead);
        let idle = run
            .me()
            .is_some_and(|me| me.movement == MovementState::Idle && me.active_action.is_none());
        if valid && idle {
            run.face_actor(target);
        }
        valid
    }

    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        let actor = run.actor();
        if self.current.is_some() && run.me().is_some_and(|me| me.target == self.current) {
            run.cx.world.set_target(actor, None);
        }
    }
}
