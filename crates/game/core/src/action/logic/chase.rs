use super::ActionBehavior;
use crate::action::ActionRun;
use crate::state::{ActorId, MovementState};

/// Moves the owner toward its first target until within `amount` metres.
///
/// Finishes early if the target despawns. Never interrupts forced movement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChaseLogic {
    target: Option<ActorId>,
}

impl ChaseLogic {
    fn in_range(run: &ActionRun<'_, '_>, target: ActorId) -> Option<bool> {
        let me = run.me()?.position;
        let there = run.cx.world.position(target)?;
        let amount = run.data.amount;
        Some(amount * amount > me.flat_distance_squared(there))
    }

    fn stop(run: &mut ActionRun<'_, '_>) {
        if let Some(me) = run.me_mut()
            && matches!(me.movement, MovementState::Follow { .. })
        {
            me.movement = MovementState::Idle;
        }
    }
}

impl ActionBehavior for ChaseLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let Some(target) = run.data.first_target() else {
            tracing::debug!(actor = %run.actor(), "chase without a target");
            return false;
        };
        self.target = Some(target);
        match Self::in_range(run, target) {
            None => return false,
            Some(true) => {
                run.face_actor(target);
                return false;
            }
            Some(false) => {}
        }
        let stop_distance = run.data.amount;
        if let Some(me) = run.me_mut()
            && !me.is_performing_forced_movement()
        {
            me.movement = MovementState::Follow {
                target,
                stop_distance,
            };
        }
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        match Self::in_range(run, target) {
            Some(false) => true,
            Some(true) => {
                run.face_actor(target);
                false
            }
            None => false,
        }
    }

    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        Self::stop(run);
    }
}
