use super::ActionBehavior;
use crate::action::{ActionEvent, ActionRun};
use crate::state::{ActorId, SimTime};

/// Pretend projectile aimed at a single target.
///
/// The hit is resolved at exec time plus the time a projectile would need
/// to cover the distance. What clients see is cosmetic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangedFxLogic {
    victim: Option<ActorId>,
    impact_at: SimTime,
    impacted: bool,
}

impl RangedFxLogic {
    /// A requested target is dropped when it is a character on the same side
    /// as the actions it would be hit by.
    fn valid_victim(run: &ActionRun<'_, '_>) -> Option<ActorId> {
        let want_pcs = run.targets_pcs();
        let id = run.data.first_target()?;
        let actor = run.cx.world.actor(id)?;
        if actor.is_character() && actor.is_npc() == want_pcs {
            return None;
        }
        Some(id)
    }
}

impl ActionBehavior for RangedFxLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        self.victim = Self::valid_victim(run);
        let aim = self
            .victim
            .and_then(|id| run.cx.world.position(id))
            .unwrap_or(run.data.position);
        run.face_point(aim);
        let Some((origin, direction)) = run.me().map(|me| (me.position, me.forward)) else {
            return false;
        };

        let def = run.def;
        let Some(projectile) = def.projectiles.first() else {
            return false;
        };
        let flight = SimTime::from_secs_f32(origin.distance(aim) / projectile.speed_mps);
        self.impact_at = def.exec_time() + flight;

        run.event(ActionEvent::ProjectileLaunched {
            actor: run.actor(),
            action: def.id,
            projectile: projectile.clone(),
            origin,
            direction,
        });
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if !self.impacted && run.elapsed() >= self.impact_at {
            self.impacted = true;
            if let Some(victim) = self.victim
                && run.cx.world.actor(victim).is_some_and(|a| a.is_damageable())
            {
                let damage = run.def.projectiles.first().map_or(0, |p| p.damage);
                run.damage(victim, damage);
            }
        }
        true
    }
}
