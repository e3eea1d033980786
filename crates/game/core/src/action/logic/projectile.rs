//! Logics whose payload is a spawned projectile.
//!
//! Projectile flight is simulated by the host. The core only decides when
//! and which projectile is launched and reports it as an
//! [`ActionEvent::ProjectileLaunched`](crate::action::ActionEvent).

use super::{ActionBehavior, percent_charged};
use crate::action::{ActionEvent, ActionRun, GameplayActivity};
use crate::state::SimTime;

/// Turns toward the requested direction, or the first target without one.
fn aim(run: &mut ActionRun<'_, '_>) {
    let direction = run.data.direction;
    if direction.is_zero() {
        run.face_first_target();
    } else if let Some(me) = run.me_mut() {
        me.face(direction);
    }
}

/// Straight shot of the first projectile at exec time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchProjectileLogic {
    launched: bool,
}

impl LaunchProjectileLogic {
    fn launch(&mut self, run: &mut ActionRun<'_, '_>) {
        if self.launched {
            return;
        }
        self.launched = true;
        let def = run.def;
        if let Some(projectile) = def.projectiles.first() {
            run.launch_projectile(projectile);
        }
    }
}

impl ActionBehavior for LaunchProjectileLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        aim(run);
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if run.reached_exec() {
            self.launch(run);
        }
        true
    }

    // Ending early still fires the shot.
    fn end(&mut self, run: &mut ActionRun<'_, '_>) {
        self.launch(run);
    }
}

/// Imp lob. Same timing as a straight shot, different host-side flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImpTossLogic {
    inner: LaunchProjectileLogic,
}

impl ActionBehavior for ImpTossLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        run.face_first_target();
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        self.inner.update(run)
    }

    fn end(&mut self, run: &mut ActionRun<'_, '_>) {
        self.inner.end(run);
    }
}

/// Charge-up shot.
///
/// Charges until exec time passes or the owner lets go. The longer the
/// charge, the stronger the projectile: only a full charge reaches the last
/// entry of the definition's projectile list. Taking a hit while charging
/// spoils the shot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargedLaunchLogic {
    stopped_at: Option<SimTime>,
    hit_by_attack: bool,
}

impl ChargedLaunchLogic {
    fn percent(&self, time_started: SimTime, now: SimTime, exec_time: SimTime) -> f32 {
        percent_charged(self.stopped_at, time_started, now, exec_time)
    }

    fn stop_charging(&mut self, run: &mut ActionRun<'_, '_>) {
        if self.stopped_at.is_some() {
            return;
        }
        self.stopped_at = Some(run.now());
        let def = run.def;
        let percent = self.percent(run.time_started, run.now(), def.exec_time());
        run.event(ActionEvent::ChargeStopped {
            actor: run.actor(),
            action: def.id,
            percent,
        });
        if self.hit_by_attack {
            return;
        }
        let tiers = def.projectiles.len();
        if tiers == 0 {
            return;
        }
        let index = ((percent * (tiers - 1) as f32) as usize).min(tiers - 1);
        run.launch_projectile(&def.projectiles[index]);
    }
}

impl ActionBehavior for ChargedLaunchLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        aim(run);
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        let exec = run.def.exec_time();
        if self.stopped_at.is_none() && self.percent(run.time_started, run.now(), exec) >= 1.0 {
            self.stop_charging(run);
        }
        self.stopped_at.is_none()
    }

    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        self.stop_charging(run);
    }

    fn on_gameplay_activity(&mut self, run: &mut ActionRun<'_, '_>, activity: GameplayActivity) {
        match activity {
            GameplayActivity::AttackedByEnemy => {
                self.hit_by_attack = true;
                self.stop_charging(run);
            }
            GameplayActivity::StoppedChargingUp => self.stop_charging(run),
            _ => {}
        }
    }
}
