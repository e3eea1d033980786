//! Client intent: which action to play, aimed where, at whom.

use crate::action::ActionId;
use crate::state::{ActorId, Vec3};

/// Transient, wire-serializable description of an action someone wants to play.
///
/// `PartialEq` compares every field. Use [`ActionRequestData::is_equivalent`]
/// to compare gameplay effect only (queueing and closing flags ignored).
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequestData {
    pub action_id: ActionId,
    pub position: Vec3,
    pub direction: Vec3,
    /// Ordered target handles. `None` means untargeted.
    pub target_ids: Option<Vec<ActorId>>,
    /// Context-dependent override, e.g. the range a chase should close to.
    pub amount: f32,
    /// Append behind running actions instead of superseding them.
    pub should_queue: bool,
    /// Close to within range of the first target before starting.
    pub should_close: bool,
    /// Stop current movement when the request is accepted.
    pub cancel_movement: bool,
}

impl ActionRequestData {
    pub fn new(action_id: ActionId) -> Self {
        Self {
            action_id,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: ActorId) -> Self {
        self.target_ids = Some(vec![target]);
        self
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = ActorId>) -> Self {
        self.target_ids = Some(targets.into_iter().collect());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = amount;
        self
    }

    pub fn queued(mut self) -> Self {
        self.should_queue = true;
        self
    }

    pub fn closing(mut self) -> Self {
        self.should_close = true;
        self
    }

    pub fn cancelling_movement(mut self) -> Self {
        self.cancel_movement = true;
        self
    }

    /// First target, if the request is targeted.
    pub fn first_target(&self) -> Option<ActorId> {
        self.target_ids.as_deref().and_then(|t| t.first().copied())
    }

    pub fn targets(&self) -> &[ActorId] {
        self.target_ids.as_deref().unwrap_or(&[])
    }

    /// True when both requests would produce the same gameplay effect.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.action_id == other.action_id
            && self.position == other.position
            && self.direction == other.direction
            && self.amount == other.amount
            && self.targets() == other.targets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalence_ignores_flags() {
        let base = ActionRequestData::new(ActionId(4)).with_target(ActorId(9));
        let queued = base.clone().queued().closing().cancelling_movement();
        assert!(base.is_equivalent(&queued));
        assert_ne!(base, queued);
    }

    #[test]
    fn empty_and_missing_targets_are_equivalent() {
        let none = ActionRequestData::new(ActionId(1));
        let empty = ActionRequestData::new(ActionId(1)).with_targets([]);
        assert!(none.is_equivalent(&empty));
        assert!(!none.is_equivalent(&none.clone().with_amount(2.0)));
    }
}
