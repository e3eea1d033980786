//! Per-definition free lists of [`ActionInstance`]s.
//!
//! Instances are created lazily the first time a definition is played and
//! recycled afterwards, so a warmed-up session allocates no instances while
//! ticking.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::{
    ActionDefinition, ActionId, ActionInstance, ActionRegistry, ActionRequestData, PoolError,
};

#[derive(Clone, Debug, Default)]
pub struct ActionPool {
    definitions: BTreeMap<ActionId, Arc<ActionDefinition>>,
    free: BTreeMap<ActionId, Vec<ActionInstance>>,
    outstanding: usize,
}

impl ActionPool {
    pub fn new(registry: &ActionRegistry) -> Self {
        let definitions = registry
            .iter()
            .filter_map(|def| registry.get_shared(def.id).map(|d| (def.id, Arc::clone(d))))
            .collect();
        Self {
            definitions,
            free: BTreeMap::new(),
            outstanding: 0,
        }
    }

    /// Takes an instance for `request.action_id`, building one if the free
    /// list is empty.
    pub fn acquire(&mut self, request: ActionRequestData) -> Result<ActionInstance, PoolError> {
        let id = request.action_id;
        let mut instance = match self.free.get_mut(&id).and_then(Vec::pop) {
            Some(instance) => instance,
            None => {
                let definition = self
                    .definitions
                    .get(&id)
                    .ok_or(PoolError::UnknownAction(id))?;
                ActionInstance::new(Arc::clone(definition))
            }
        };
        debug_assert!(instance.is_pristine(), "pooled {id} carried state");
        instance.initialize(request);
        self.outstanding += 1;
        Ok(instance)
    }

    /// Resets `instance` and puts it back on its free list.
    pub fn release(&mut self, mut instance: ActionInstance) {
        instance.reset();
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.entry(instance.id()).or_default().push(instance);
    }

    /// Free instances held for `id`.
    pub fn available(&self, id: ActionId) -> usize {
        self.free.get(&id).map_or(0, Vec::len)
    }

    pub fn free_instances(&self, id: ActionId) -> impl Iterator<Item = &ActionInstance> {
        self.free.get(&id).into_iter().flatten()
    }

    /// Instances acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDefinition, ActionLogic, InstancePhase};

    fn registry() -> ActionRegistry {
        ActionRegistry::builder()
            .definition(ActionDefinition::new(ActionId(1), "chase", ActionLogic::Chase))
            .definition(
                ActionDefinition::new(ActionId(2), "swing", ActionLogic::Melee).with_timing(0.4, 1.0),
            )
            .general_chase(ActionId(1))
            .build()
            .unwrap()
    }

    #[test]
    fn released_instances_are_recycled_clean() {
        let mut pool = ActionPool::new(&registry());
        let instance = pool.acquire(ActionRequestData::new(ActionId(2))).unwrap();
        assert_eq!(instance.phase(), InstancePhase::Initialized);
        assert_eq!(pool.outstanding(), 1);

        pool.release(instance);
        assert_eq!(pool.available(ActionId(2)), 1);
        assert_eq!(pool.outstanding(), 0);

        let again = pool.acquire(ActionRequestData::new(ActionId(2)).with_amount(3.0)).unwrap();
        assert_eq!(pool.available(ActionId(2)), 0);
        assert_eq!(again.request().amount, 3.0);
        assert_eq!(again.logic(), ActionLogic::Melee);
    }

    #[test]
    fn unknown_action_is_an_error() {
        let mut pool = ActionPool::new(&registry());
        let err = pool.acquire(ActionRequestData::new(ActionId(9))).unwrap_err();
        assert_eq!(err, PoolError::UnknownAction(ActionId(9)));
    }
}
