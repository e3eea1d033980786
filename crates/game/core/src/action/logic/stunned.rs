use super::ActionBehavior;
use crate::action::{ActionRun, BuffableValue, InstanceView};

/// Helpless for the whole duration. Damage taken is multiplied by `amount`
/// when it is positive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StunnedLogic;

impl ActionBehavior for StunnedLogic {
    fn start(&mut self, _run: &mut ActionRun<'_, '_>) -> bool {
        true
    }

    fn buff_value(&self, view: &InstanceView<'_>, buff: BuffableValue, value: &mut f32) {
        if buff == BuffableValue::PercentDamageReceived && view.def.amount > 0 {
            *value *= view.def.amount as f32;
        }
    }
}
