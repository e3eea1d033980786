use super::ActionBehavior;
use crate::action::ActionRun;
use crate::config::GameConfig;
use crate::state::{LifeState, QueryMask};

/// Grabs the nearest heavy object straight ahead at exec time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickUpLogic {
    attempted: bool,
}

impl PickUpLogic {
    fn try_pick_up(run: &mut ActionRun<'_, '_>) -> bool {
        let Some((origin, forward)) = run.me().map(|me| (me.position, me.forward)) else {
            return false;
        };
        let hits = run.cx.env.spatial.cast_box(
            run.cx.world,
            origin,
            forward,
            GameConfig::ACTOR_RADIUS,
            run.def.range,
            QueryMask::HEAVY,
        );
        let carried = |id| run.cx.world.actors().any(|a| a.held_object == Some(id));
        let Some(object) = hits.into_iter().find(|id| !carried(*id)) else {
            return false;
        };
        let actor = run.actor();
        run.cx.world.set_held_object(actor, Some(object));
        run.data.target_ids = None;
        run.cx.world.set_target(actor, None);
        true
    }
}

impl ActionBehavior for PickUpLogic {
    fn start(&mut self, _run: &mut ActionRun<'_, '_>) -> bool {
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if !self.attempted && run.reached_exec() {
            self.attempted = true;
            if !Self::try_pick_up(run) {
                tracing::debug!(actor = %run.actor(), "nothing to pick up");
                return false;
            }
        }
        true
    }

    // Fainting drops whatever was being carried.
    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        let actor = run.actor();
        if run.me().is_some_and(|me| me.life_state == LifeState::Fainted) {
            run.cx.world.set_held_object(actor, None);
        }
    }
}

/// Lets go of the held object at exec time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropLogic;

impl ActionBehavior for DropLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        run.me().is_some_and(|me| me.held_object.is_some())
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if !run.reached_exec() {
            return true;
        }
        let actor = run.actor();
        run.cx.world.set_held_object(actor, None);
        false
    }
}
