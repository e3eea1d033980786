use std::collections::BTreeMap;

use super::actor::{ActorState, LifeState};
use super::common::{ActorId, HitPoints, Vec3};
use crate::action::ActionRequestData;
use crate::state::delta::{ReplicatedActor, ReplicatedFields, ReplicationDelta};
use crate::state::error::StateError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Spawned,
    Changed(ReplicatedFields),
}

/// Every spawned actor, keyed by handle.
///
/// Ordered by handle so iteration is identical across runs. Replicated
/// fields are written through the setters below, which record what changed;
/// [`World::actor_mut`] is reserved for server-only fields such as facing and
/// movement.
#[derive(Clone, Debug, Default)]
pub struct World {
    actors: BTreeMap<ActorId, ActorState>,
    pending: BTreeMap<ActorId, Pending>,
    despawned: Vec<ActorId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: ActorState) -> Result<(), StateError> {
        if self.actors.contains_key(&actor.id) {
            return Err(StateError::DuplicateActor(actor.id));
        }
        self.pending.insert(actor.id, Pending::Spawned);
        self.actors.insert(actor.id, actor);
        Ok(())
    }

    pub fn remove(&mut self, id: ActorId) -> Result<ActorState, StateError> {
        let actor = self
            .actors
            .remove(&id)
            .ok_or(StateError::ActorNotFound(id))?;
        // A spawn that was never replicated needs no despawn either.
        if self.pending.remove(&id) != Some(Pending::Spawned) {
            self.despawned.push(id);
        }
        Ok(actor)
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    /// Mutable access for server-only fields. Replicated fields must go
    /// through the dedicated setters.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values()
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn position(&self, id: ActorId) -> Option<Vec3> {
        self.actor(id).map(|a| a.position)
    }

    fn mark(&mut self, id: ActorId, field: ReplicatedFields) {
        match self.pending.get_mut(&id) {
            Some(Pending::Spawned) => {}
            Some(Pending::Changed(fields)) => fields.insert(field),
            None => {
                self.pending.insert(id, Pending::Changed(field));
            }
        }
    }

    /// Applies a signed hit point change, clamped to the actor's maximum.
    /// Returns the resulting meter.
    pub fn apply_hit_points(&mut self, id: ActorId, delta: i32) -> Option<HitPoints> {
        let actor = self.actors.get_mut(&id)?;
        let before = actor.hit_points;
        actor.hit_points.apply(delta);
        let after = actor.hit_points;
        if before != after {
            self.mark(id, ReplicatedFields::HIT_POINTS);
        }
        Some(after)
    }

    pub fn set_hit_points(&mut self, id: ActorId, current: i32) {
        if let Some(actor) = self.actors.get_mut(&id) {
            let clamped = current.clamp(0, actor.hit_points.maximum);
            if actor.hit_points.current != clamped {
                actor.hit_points.current = clamped;
                self.mark(id, ReplicatedFields::HIT_POINTS);
            }
        }
    }

    pub fn set_life_state(&mut self, id: ActorId, life_state: LifeState) {
        if let Some(actor) = self.actors.get_mut(&id)
            && actor.life_state != life_state
        {
            actor.life_state = life_state;
            self.mark(id, ReplicatedFields::LIFE_STATE);
        }
    }

    pub fn set_target(&mut self, id: ActorId, target: Option<ActorId>) {
        if let Some(actor) = self.actors.get_mut(&id)
            && actor.target != target
        {
            actor.target = target;
            self.mark(id, ReplicatedFields::TARGET);
        }
    }

    pub fn set_stealthy(&mut self, id: ActorId, is_stealthy: bool) {
        if let Some(actor) = self.actors.get_mut(&id)
            && actor.is_stealthy != is_stealthy
        {
            actor.is_stealthy = is_stealthy;
            self.mark(id, ReplicatedFields::STEALTH);
        }
    }

    pub fn set_position(&mut self, id: ActorId, position: Vec3) {
        if let Some(actor) = self.actors.get_mut(&id)
            && actor.position != position
        {
            actor.position = position;
            self.mark(id, ReplicatedFields::POSITION);
        }
    }

    pub fn set_held_object(&mut self, id: ActorId, held: Option<ActorId>) {
        if let Some(actor) = self.actors.get_mut(&id)
            && actor.held_object != held
        {
            actor.held_object = held;
            self.mark(id, ReplicatedFields::HELD_OBJECT);
        }
    }

    pub fn set_active_action(&mut self, id: ActorId, active: Option<ActionRequestData>) {
        if let Some(actor) = self.actors.get_mut(&id)
            && actor.active_action != active
        {
            actor.active_action = active;
            self.mark(id, ReplicatedFields::ACTIVE_ACTION);
        }
    }

    /// Returns and clears every change recorded since the last drain.
    ///
    /// Despawns come last so a peer never sees a change for a handle it has
    /// already dropped.
    pub fn drain_deltas(&mut self) -> Vec<ReplicationDelta> {
        let pending = std::mem::take(&mut self.pending);
        let mut deltas = Vec::with_capacity(pending.len() + self.despawned.len());
        for (id, entry) in pending {
            let Some(actor) = self.actors.get(&id) else {
                continue;
            };
            let state = ReplicatedActor::from(actor);
            deltas.push(match entry {
                Pending::Spawned => ReplicationDelta::Spawned(state),
                Pending::Changed(changed) => ReplicationDelta::Changed { changed, state },
            });
        }
        deltas.extend(self.despawned.drain(..).map(ReplicationDelta::Despawned));
        deltas
    }

    /// Full replicated view, used for late joiners and snapshots.
    pub fn replicated(&self) -> Vec<ReplicatedActor> {
        self.actors.values().map(ReplicatedActor::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ClassId;
    use crate::state::ActorTraits;

    fn actor(id: u64) -> ActorState {
        ActorState::new(ActorId(id), ClassId(0), ActorTraits::empty(), 100)
    }

    #[test]
    fn spawn_then_change_reports_single_spawn() {
        let mut world = World::new();
        world.insert(actor(1)).unwrap();
        world.apply_hit_points(ActorId(1), -10);

        let deltas = world.drain_deltas();
        assert_eq!(deltas.len(), 1);
        assert!(matches!(&deltas[0], ReplicationDelta::Spawned(s) if s.hit_points.current == 90));
        assert!(world.drain_deltas().is_empty());
    }

    #[test]
    fn unchanged_values_do_not_mark_dirty() {
        let mut world = World::new();
        world.insert(actor(1)).unwrap();
        world.drain_deltas();

        world.set_stealthy(ActorId(1), false);
        world.set_target(ActorId(1), None);
        assert!(world.drain_deltas().is_empty());

        world.set_target(ActorId(1), Some(ActorId(7)));
        world.set_stealthy(ActorId(1), true);
        let deltas = world.drain_deltas();
        match &deltas[0] {
            ReplicationDelta::Changed { changed, .. } => {
                assert_eq!(*changed, ReplicatedFields::TARGET | ReplicatedFields::STEALTH);
            }
            other => panic!("unexpected delta {other:?}"),
        }
    }

    #[test]
    fn duplicate_spawn_is_rejected() {
        let mut world = World::new();
        world.insert(actor(3)).unwrap();
        assert_eq!(
            world.insert(actor(3)),
            Err(StateError::DuplicateActor(ActorId(3)))
        );
    }

    #[test]
    fn despawn_after_replication_is_reported() {
        let mut world = World::new();
        world.insert(actor(1)).unwrap();
        world.drain_deltas();
        world.remove(ActorId(1)).unwrap();
        assert_eq!(
            world.drain_deltas(),
            vec![ReplicationDelta::Despawned(ActorId(1))]
        );
    }
}
