use std::collections::BTreeSet;

use super::ActionBehavior;
use crate::action::{ActionEffect, ActionRequestData, ActionRun, Collision, InstanceView};
use crate::env::{compute_seed, roll};
use crate::state::{ActorId, ActorTraits, MovementState, SimTime};

/// Progress of a trample, derived from elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TrampleStage {
    #[default]
    Windup,
    Charging,
    Complete,
}

/// Forward charge that bowls over everything in its path.
///
/// Each victim is hit once. Characters of the other side take the full
/// amount if they were the requested target and splash damage otherwise,
/// then get knocked back. A victim whose buffs give it a chance to stun
/// tramplers may stop the charge dead, as do `STUN_ON_TRAMPLE` props; a
/// stunned trampler chains into the stun action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrampleLogic {
    previous: TrampleStage,
    collided: BTreeSet<ActorId>,
    stunned: bool,
}

impl TrampleLogic {
    fn stage(elapsed: SimTime, exec: SimTime, duration: SimTime) -> TrampleStage {
        if elapsed < exec {
            TrampleStage::Windup
        } else if elapsed < duration {
            TrampleStage::Charging
        } else {
            TrampleStage::Complete
        }
    }

    fn current_stage(run: &ActionRun<'_, '_>) -> TrampleStage {
        Self::stage(run.elapsed(), run.def.exec_time(), run.def.duration())
    }

    fn stun_self(&mut self, run: &mut ActionRun<'_, '_>) {
        if !self.stunned
            && let Some(me) = run.me_mut()
        {
            me.movement = MovementState::Idle;
        }
        self.stunned = true;
    }

    fn collide_with_character(&mut self, run: &mut ActionRun<'_, '_>, collision: Collision) {
        let victim = collision.other;
        if collision.chance_to_stun > 0.0 {
            let env = run.cx.env;
            let context = roll::TRAMPLE_STUN ^ ((victim.0 as u32) << 8);
            let seed = compute_seed(env.config.game_seed, run.cx.tick, run.actor().0, context);
            if env.rng.unit_f32(seed) < collision.chance_to_stun {
                tracing::debug!(actor = %run.actor(), %victim, "trampler stunned");
                self.stun_self(run);
                return;
            }
        }
        let damage = if run.data.first_target() == Some(victim) {
            run.def.amount
        } else {
            run.def.splash_damage
        };
        run.damage(victim, damage);
        let Some(origin) = run.me().map(|me| me.position) else {
            return;
        };
        let def = run.def;
        run.effect(ActionEffect::Knockback {
            source: run.actor(),
            target: victim,
            origin,
            speed: def.knockback_speed,
            duration: SimTime::from_secs_f32(def.knockback_duration),
        });
    }

    fn collide(&mut self, run: &mut ActionRun<'_, '_>, collision: Collision) {
        let victim = collision.other;
        if victim == run.actor() || self.stunned || !self.collided.insert(victim) {
            return;
        }
        let Some(other) = run.cx.world.actor(victim) else {
            return;
        };
        let (is_character, other_is_npc, traits, damageable) = (
            other.is_character(),
            other.is_npc(),
            other.traits,
            other.is_damageable(),
        );
        if is_character {
            if other_is_npc != run.is_npc() {
                self.collide_with_character(run, collision);
            }
        } else if damageable && traits.contains(ActorTraits::BREAKABLE) {
            let splash = run.def.splash_damage;
            run.damage(victim, splash);
            if traits.contains(ActorTraits::STUN_ON_TRAMPLE) {
                self.stun_self(run);
            }
        }
    }
}

impl ActionBehavior for TrampleLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        self.previous = TrampleStage::Windup;
        run.face_first_target();
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let stage = Self::current_stage(run);
        if stage != self.previous && stage == TrampleStage::Charging {
            let def = run.def;
            let speed = def.move_speed;
            let until = run.time_started + def.duration();
            if let Some(me) = run.me_mut() {
                me.movement = MovementState::Charge { speed, until };
            }
            // Whoever we are already touching gets hit too.
            let touch = run.cx.env.config.physical_touch_distance;
            run.probe_contacts(touch);
        }
        self.previous = stage;
        stage != TrampleStage::Complete && !self.stunned
    }

    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        if let Some(me) = run.me_mut()
            && matches!(me.movement, MovementState::Charge { .. })
        {
            me.movement = MovementState::Idle;
        }
    }

    fn collision_entered(&mut self, run: &mut ActionRun<'_, '_>, collision: Collision) {
        if Self::current_stage(run) == TrampleStage::Charging {
            self.collide(run, collision);
        }
    }

    fn chain_into_new_action(&self, view: &InstanceView<'_>) -> Option<ActionRequestData> {
        if !self.stunned {
            return None;
        }
        view.actions.stun().map(ActionRequestData::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_follow_exec_and_duration() {
        let exec = SimTime::from_millis(500);
        let duration = SimTime::from_millis(2000);
        let stage = |ms| TrampleLogic::stage(SimTime::from_millis(ms), exec, duration);
        assert_eq!(stage(0), TrampleStage::Windup);
        assert_eq!(stage(499), TrampleStage::Windup);
        assert_eq!(stage(500), TrampleStage::Charging);
        assert_eq!(stage(1999), TrampleStage::Charging);
        assert_eq!(stage(2000), TrampleStage::Complete);
    }
}
