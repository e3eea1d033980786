use super::{ActionBehavior, percent_charged};
use crate::action::{ActionEvent, ActionRun, BuffableValue, GameplayActivity, InstanceView};
use crate::state::SimTime;

/// Raised shield that grows stronger while held.
///
/// Damage reduction starts at 50% and reaches 100% at full charge. A fully
/// charged shield also stuns tramplers. After the owner lets go, the shield
/// lingers for the effect duration without blocking the queue.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargedShieldLogic {
    stopped_at: Option<SimTime>,
}

impl ChargedShieldLogic {
    fn percent(&self, view: &InstanceView<'_>) -> f32 {
        percent_charged(self.stopped_at, view.time_started, view.now, view.def.exec_time())
    }

    fn stop_charging(&mut self, run: &mut ActionRun<'_, '_>) {
        if self.stopped_at.is_some() {
            return;
        }
        self.stopped_at = Some(run.now());
        let percent = self.percent(&run.view());
        run.event(ActionEvent::ChargeStopped {
            actor: run.actor(),
            action: run.def.id,
            percent,
        });
    }
}

impl ActionBehavior for ChargedShieldLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        run.face_first_target();
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if self.stopped_at.is_none() && self.percent(&run.view()) >= 1.0 {
            self.stop_charging(run);
        }
        match self.stopped_at {
            None => true,
            Some(stopped) => run.now() < stopped + run.def.effect_duration(),
        }
    }

    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        self.stop_charging(run);
    }

    fn should_become_non_blocking(&self, _view: &InstanceView<'_>) -> bool {
        self.stopped_at.is_some()
    }

    fn buff_value(&self, view: &InstanceView<'_>, buff: BuffableValue, value: &mut f32) {
        let percent = self.percent(view);
        match buff {
            BuffableValue::PercentDamageReceived => {
                let reduction = 0.5 + percent * percent / 2.0;
                *value *= 1.0 - reduction;
            }
            BuffableValue::ChanceToStunTramplers if percent >= 1.0 => *value = 1.0,
            _ => {}
        }
    }

    fn on_gameplay_activity(&mut self, run: &mut ActionRun<'_, '_>, activity: GameplayActivity) {
        if activity == GameplayActivity::StoppedChargingUp {
            self.stop_charging(run);
        }
    }
}
