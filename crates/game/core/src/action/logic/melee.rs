use super::{ActionBehavior, ideal_melee_foe};
use crate::action::ActionRun;
use crate::config::GameConfig;
use crate::state::ActorId;

/// Close-range strike.
///
/// Picks a provisional victim on start so peers can show who is being
/// swung at, then strikes once at exec time against whoever is in front.
/// No victim means no damage; the swing still plays out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeleeLogic {
    provisional: Option<ActorId>,
    fired: bool,
}

impl MeleeLogic {
    fn strike(&mut self, run: &mut ActionRun<'_, '_>) {
        self.fired = true;
        let range = run.def.range;
        if let Some(foe) = ideal_melee_foe(run, GameConfig::ACTOR_RADIUS, range, self.provisional) {
            let amount = run.def.amount;
            run.damage(foe, amount);
        }
    }
}

impl ActionBehavior for MeleeLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        run.face_first_target();
        let hint = run.data.first_target();
        self.provisional = ideal_melee_foe(run, GameConfig::ACTOR_RADIUS, run.def.range, hint);
        if let Some(foe) = self.provisional {
            run.data.target_ids = Some(vec![foe]);
        }
        if run.def.exec_time().is_zero() {
            self.strike(run);
        }
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if !self.fired && run.reached_exec() {
            self.strike(run);
        }
        true
    }
}
