use super::ActionBehavior;
use crate::action::ActionRun;

/// Cosmetic action. Plays for its duration, or ends at once without one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmoteLogic;

impl ActionBehavior for EmoteLogic {
    fn start(&mut self, run: &mut ActionRun<'_, '_>) -> bool {
        run.def.is_expirable()
    }
}
