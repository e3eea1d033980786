use super::ActionBehavior;
use crate::action::ActionRun;
use crate::state::QueryMask;

/// Area strike centred on the requested point.
///
/// The point is re-validated against the owner's server position, since
/// the client may have aimed from a stale one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AoeLogic {
    done: bool,
}

impl AoeLogic {
    fn perform(&mut self, run: &mut ActionRun<'_, '_>) {
        self.done = true;
        let mask = QueryMask::foes(run.targets_pcs());
        let victims = run.cx.env.spatial.overlap_sphere(
            run.cx.world,
            run.data.position,
            run.def.radius,
            mask,
        );
        let amount = run.def.amount;
        let me = run.actor();
        for victim in victims {
            if victim != me && run.cx.world.actor(victim).is_some_and(|a| a.is_damageable()) {
                run.damage(victim, amount);
            }
        }
    }
}

impl ActionBehavior for AoeLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let Some(origin) = run.me().map(|me| me.position) else {
            return false;
        };
        let reach = run.def.range + run.cx.env.config.aoe_max_distance_divergence;
        if origin.distance(run.data.position) > reach {
            tracing::debug!(actor = %run.actor(), "aoe point out of reach");
            return false;
        }
        run.data.target_ids = Some(Vec::new());
        if run.def.exec_time().is_zero() {
            self.perform(run);
        }
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if !self.done && run.reached_exec() {
            self.perform(run);
        }
        true
    }
}
