//! One behavior per [`ActionLogic`].
//!
//! Each logic is a small state struct implementing [`ActionBehavior`]. The
//! closed [`LogicState`] enum is built once per pooled instance from the
//! definition's logic tag, so the tick dispatches with a plain `match`.
//! `Default` is the post-reset state of every logic.

mod aoe;
mod chase;
mod dash;
mod emote;
mod melee;
mod pickup;
mod projectile;
mod ranged;
mod revive;
mod shield;
mod stealth;
mod stunned;
mod target;
mod trample;

pub use aoe::AoeLogic;
pub use chase::ChaseLogic;
pub use dash::DashAttackLogic;
pub use emote::EmoteLogic;
pub use melee::MeleeLogic;
pub use pickup::{DropLogic, PickUpLogic};
pub use projectile::{ChargedLaunchLogic, ImpTossLogic, LaunchProjectileLogic};
pub use ranged::RangedFxLogic;
pub use revive::ReviveLogic;
pub use shield::ChargedShieldLogic;
pub use stealth::StealthLogic;
pub use stunned::StunnedLogic;
pub use target::TargetLogic;
pub use trample::TrampleLogic;

use crate::action::{
    ActionLogic, ActionRequestData, ActionRun, BlockingMode, BuffableValue, Collision,
    GameplayActivity, InstanceView,
};
use crate::state::{ActorId, QueryMask, SimTime};

/// Lifecycle callbacks every logic implements.
///
/// `start` and `update` return whether the action has more work to do.
/// `cancel` must be idempotent.
pub trait ActionBehavior {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool;

    fn update(&mut self, _run: &mut ActionRun<'_, '_>) -> bool {
        true
    }

    fn end(&mut self, run: &mut ActionRun<'_, '_>) {
        self.cancel(run);
    }

    fn cancel(&mut self, _run: &mut ActionRun<'_, '_>) {}

    fn should_become_non_blocking(&self, view: &InstanceView<'_>) -> bool {
        view.def.blocking_mode == BlockingMode::OnlyDuringExecTime && view.reached_exec()
    }

    fn buff_value(&self, _view: &InstanceView<'_>, _buff: BuffableValue, _value: &mut f32) {}

    fn on_gameplay_activity(&mut self, _run: &mut ActionRun<'_, '_>, _activity: GameplayActivity) {
    }

    /// Follow-up request to play once this action ends normally.
    fn chain_into_new_action(&self, _view: &InstanceView<'_>) -> Option<ActionRequestData> {
        None
    }

    fn collision_entered(&mut self, _run: &mut ActionRun<'_, '_>, _collision: Collision) {}
}

macro_rules! logic_state {
    ($($variant:ident($logic:ty)),+ $(,)?) => {
        /// Runtime state of one instance, tagged by logic.
        #[derive(Clone, Debug, PartialEq)]
        pub enum LogicState {
            $($variant($logic),)+
        }

        impl LogicState {
            pub fn for_logic(logic: ActionLogic) -> Self {
                match logic {
                    $(ActionLogic::$variant => Self::$variant(<$logic>::default()),)+
                }
            }

            pub fn logic(&self) -> ActionLogic {
                match self {
                    $(Self::$variant(_) => ActionLogic::$variant,)+
                }
            }

            /// Restores the post-reset defaults, keeping the variant.
            pub fn reset(&mut self) {
                *self = Self::for_logic(self.logic());
            }

            pub fn is_reset(&self) -> bool {
                *self == Self::for_logic(self.logic())
            }

            fn behavior(&self) -> &dyn ActionBehavior {
                match self {
                    $(Self::$variant(s) => s,)+
                }
            }

            fn behavior_mut(&mut self) -> &mut dyn ActionBehavior {
                match self {
                    $(Self::$variant(s) => s,)+
                }
            }
        }
    };
}

logic_state! {
    Melee(MeleeLogic),
    RangedFxTargeted(RangedFxLogic),
    Chase(ChaseLogic),
    Revive(ReviveLogic),
    LaunchProjectile(LaunchProjectileLogic),
    Emote(EmoteLogic),
    AoE(AoeLogic),
    Trample(TrampleLogic),
    ChargedShield(ChargedShieldLogic),
    Stunned(StunnedLogic),
    Target(TargetLogic),
    ChargedLaunchProjectile(ChargedLaunchLogic),
    StealthMode(StealthLogic),
    DashAttack(DashAttackLogic),
    ImpToss(ImpTossLogic),
    PickUp(PickUpLogic),
    Drop(DropLogic),
}

impl ActionBehavior for LogicState {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        self.behavior_mut().start(run)
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        self.behavior_mut().update(run)
    }

    fn end(&mut self, run: &mut ActionRun<'_, '_>) {
        self.behavior_mut().end(run)
    }

    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        self.behavior_mut().cancel(run)
    }

    fn should_become_non_blocking(&self, view: &InstanceView<'_>) -> bool {
        self.behavior().should_become_non_blocking(view)
    }

    fn buff_value(&self, view: &InstanceView<'_>, buff: BuffableValue, value: &mut f32) {
        self.behavior().buff_value(view, buff, value)
    }

    fn on_gameplay_activity(&mut self, run: &mut ActionRun<'_, '_>, activity: GameplayActivity) {
        self.behavior_mut().on_gameplay_activity(run, activity)
    }

    fn chain_into_new_action(&self, view: &InstanceView<'_>) -> Option<ActionRequestData> {
        self.behavior().chain_into_new_action(view)
    }

    fn collision_entered(&mut self, run: &mut ActionRun<'_, '_>, collision: Collision) {
        self.behavior_mut().collision_entered(run, collision)
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Best melee victim in front of the owner.
///
/// Sweeps a box of `half_width` out to `range` along the owner's facing.
/// `preferred` wins if it was hit; otherwise the nearest damageable hit.
pub(crate) fn ideal_melee_foe(
    run: &ActionRun<'_, '_>,
    half_width: f32,
    range: f32,
    preferred: Option<ActorId>,
) -> Option<ActorId> {
    let me = run.me()?;
    let mask = QueryMask::foes(run.targets_pcs());
    let hits = run.cx.env.spatial.cast_box(
        run.cx.world,
        me.position,
        me.forward,
        half_width,
        range + run.cx.env.config.melee_range_padding,
        mask,
    );
    let damageable = |id: &ActorId| {
        *id != me.id
            && run
                .cx
                .world
                .actor(*id)
                .is_some_and(|a| a.is_damageable())
    };
    if let Some(preferred) = preferred
        && hits.iter().any(|id| *id == preferred)
        && damageable(&preferred)
    {
        return Some(preferred);
    }
    hits.into_iter().find(|id| damageable(id))
}

/// Charge fraction in `[0, 1]`.
///
/// Measured up to `stopped_at` when charging stopped, otherwise up to now.
/// A zero exec time counts as fully charged.
pub(crate) fn percent_charged(
    stopped_at: Option<SimTime>,
    time_started: SimTime,
    now: SimTime,
    exec_time: SimTime,
) -> f32 {
    if exec_time.is_zero() {
        return 1.0;
    }
    let spent = stopped_at.unwrap_or(now).saturating_sub(time_started);
    (spent.as_micros() as f32 / exec_time.as_micros() as f32).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_logic_has_a_reset_state() {
        for logic in ActionLogic::iter() {
            let state = LogicState::for_logic(logic);
            assert_eq!(state.logic(), logic);
            assert!(state.is_reset());
        }
    }

    #[test]
    fn charge_percentage_saturates() {
        let exec = SimTime::from_secs_f32(2.0);
        assert_eq!(percent_charged(None, SimTime::ZERO, SimTime::from_secs_f32(1.0), exec), 0.5);
        assert_eq!(percent_charged(None, SimTime::ZERO, SimTime::from_secs_f32(5.0), exec), 1.0);
        assert_eq!(
            percent_charged(
                Some(SimTime::from_secs_f32(0.5)),
                SimTime::ZERO,
                SimTime::from_secs_f32(5.0),
                exec
            ),
            0.25
        );
        assert_eq!(percent_charged(None, SimTime::ZERO, SimTime::ZERO, SimTime::ZERO), 1.0);
    }
}
