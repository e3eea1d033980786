use super::ActionBehavior;
use crate::action::{ActionRun, GameplayActivity, InstanceView};

/// Turns the owner invisible to AI once exec time passes.
///
/// Stealth stops blocking as soon as it takes hold and is broken by
/// attacking, being attacked, or the duration running out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StealthLogic {
    started: bool,
    ended: bool,
}

impl StealthLogic {
    fn end_stealth(&mut self, run: &mut ActionRun<'_, '_>) {
        if self.ended {
            return;
        }
        self.ended = true;
        if self.started {
            let actor = run.actor();
            run.cx.world.set_stealthy(actor, false);
        }
    }
}

impl ActionBehavior for StealthLogic {
    fn start(&mut self, _run: &mut ActionRun<'_, '_>) -> bool {
        true
    }

    fn update(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        if run.reached_exec() && !self.started && !self.ended {
            self.started = true;
            let actor = run.actor();
            run.cx.world.set_stealthy(actor, true);
        }
        !self.ended
    }

    fn cancel(&mut self, run: &mut ActionRun<'_, '_>) {
        self.end_stealth(run);
    }

    fn should_become_non_blocking(&self, view: &InstanceView<'_>) -> bool {
        view.reached_exec()
    }

    fn on_gameplay_activity(&mut self, run: &mut ActionRun<'_, '_>, activity: GameplayActivity) {
        if matches!(
            activity,
            GameplayActivity::UsingAttackAction | GameplayActivity::AttackedByEnemy
        ) {
            self.end_stealth(run);
        }
    }
}
