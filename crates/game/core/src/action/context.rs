//! Everything an action touches while it runs.
//!
//! Logics mutate their own actor directly through the world. Anything that
//! lands on another actor (damage, healing, knockback, revive) is pushed to
//! the [`Outbox`] as an [`ActionEffect`] and resolved by the engine right
//! after the owner's update, where buffs, hate and life-state changes apply.

use crate::action::{
    ActionDefinition, ActionId, ActionPool, ActionRegistry, ActionRequestData, ProjectileInfo,
};
use crate::env::Env;
use crate::state::{ActorId, ActorState, SimTime, Vec3, World};

/// Deferred change aimed at another actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEffect {
    /// Signed hit point change. Negative values are damage.
    HitPoints {
        source: ActorId,
        target: ActorId,
        delta: i32,
    },
    /// Brings a fainted actor back with `hit_points`.
    Revive {
        source: ActorId,
        target: ActorId,
        hit_points: i32,
    },
    /// Pushes `target` away from `origin`.
    Knockback {
        source: ActorId,
        target: ActorId,
        origin: Vec3,
        speed: f32,
        duration: SimTime,
    },
}

/// Presentation-facing notification. The core never renders anything; hosts
/// forward these to whoever does.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEvent {
    Started {
        actor: ActorId,
        request: ActionRequestData,
    },
    Ended {
        actor: ActorId,
        action: ActionId,
    },
    Cancelled {
        actor: ActorId,
        action: ActionId,
    },
    ProjectileLaunched {
        actor: ActorId,
        action: ActionId,
        projectile: ProjectileInfo,
        origin: Vec3,
        direction: Vec3,
    },
    ChargeStopped {
        actor: ActorId,
        action: ActionId,
        percent: f32,
    },
}

/// Request to report everything currently touching `actor` as collisions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactProbe {
    pub actor: ActorId,
    pub radius: f32,
}

/// Per-tick sink for effects and events.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    pub effects: Vec<ActionEffect>,
    pub events: Vec<ActionEvent>,
    pub probes: Vec<ContactProbe>,
}

impl Outbox {
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.events.is_empty() && self.probes.is_empty()
    }
}

/// A physical contact reported by movement integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub other: ActorId,
    /// The other actor's buffed [`ChanceToStunTramplers`](crate::action::BuffableValue).
    pub chance_to_stun: f32,
}

/// Mutable view of the simulation handed to one actor's action player.
pub struct ActionContext<'a> {
    pub actor: ActorId,
    pub now: SimTime,
    pub tick: u64,
    pub world: &'a mut World,
    pub env: Env<'a>,
    pub pool: &'a mut ActionPool,
    pub outbox: &'a mut Outbox,
}

impl<'a> ActionContext<'a> {
    pub fn actions(&self) -> &'a ActionRegistry {
        self.env.actions
    }

    pub fn me(&self) -> Option<&ActorState> {
        self.world.actor(self.actor)
    }
}

/// Read-only view of one instance, for queries that must not mutate.
#[derive(Clone, Copy)]
pub struct InstanceView<'v> {
    pub def: &'v ActionDefinition,
    pub data: &'v ActionRequestData,
    pub time_started: SimTime,
    pub now: SimTime,
    pub actions: &'v ActionRegistry,
}

impl InstanceView<'_> {
    pub fn elapsed(&self) -> SimTime {
        self.now.saturating_sub(self.time_started)
    }

    pub fn reached_exec(&self) -> bool {
        self.elapsed() >= self.def.exec_time()
    }
}

/// One callback invocation on one instance.
pub struct ActionRun<'r, 'a> {
    pub cx: &'r mut ActionContext<'a>,
    pub def: &'r ActionDefinition,
    pub data: &'r mut ActionRequestData,
    pub time_started: SimTime,
}

impl ActionRun<'_, '_> {
    pub fn actor(&self) -> ActorId {
        self.cx.actor
    }

    pub fn now(&self) -> SimTime {
        self.cx.now
    }

    pub fn elapsed(&self) -> SimTime {
        self.cx.now.saturating_sub(self.time_started)
    }

    pub fn reached_exec(&self) -> bool {
        self.elapsed() >= self.def.exec_time()
    }

    pub fn me(&self) -> Option<&ActorState> {
        self.cx.world.actor(self.cx.actor)
    }

    pub fn me_mut(&mut self) -> Option<&mut ActorState> {
        self.cx.world.actor_mut(self.cx.actor)
    }

    pub fn is_npc(&self) -> bool {
        self.me().is_some_and(ActorState::is_npc)
    }

    /// Attacks hit player characters when this evaluates true.
    pub fn targets_pcs(&self) -> bool {
        self.def.is_friendly ^ self.is_npc()
    }

    /// Turns the owner toward a spawned actor. Returns false if it is gone.
    pub fn face_actor(&mut self, target: ActorId) -> bool {
        let Some(point) = self.cx.world.position(target) else {
            return false;
        };
        self.face_point(point);
        true
    }

    pub fn face_point(&mut self, point: Vec3) {
        if let Some(me) = self.me_mut() {
            me.look_at(point);
        }
    }

    /// Faces the first requested target if it is still spawned.
    pub fn face_first_target(&mut self) {
        if let Some(target) = self.data.first_target() {
            self.face_actor(target);
        }
    }

    pub fn change_hit_points(&mut self, target: ActorId, delta: i32) {
        self.cx.outbox.effects.push(ActionEffect::HitPoints {
            source: self.cx.actor,
            target,
            delta,
        });
    }

    pub fn damage(&mut self, target: ActorId, amount: i32) {
        self.change_hit_points(target, -amount);
    }

    pub fn effect(&mut self, effect: ActionEffect) {
        self.cx.outbox.effects.push(effect);
    }

    pub fn event(&mut self, event: ActionEvent) {
        self.cx.outbox.events.push(event);
    }

    /// Launches `projectile` from the owner along its facing.
    pub fn launch_projectile(&mut self, projectile: &ProjectileInfo) {
        let Some((origin, direction)) = self.me().map(|me| (me.position, me.forward)) else {
            return;
        };
        let event = ActionEvent::ProjectileLaunched {
            actor: self.cx.actor,
            action: self.def.id,
            projectile: projectile.clone(),
            origin,
            direction,
        };
        self.event(event);
    }

    /// Asks the engine to deliver contacts within `radius` of the owner
    /// through [`ActionBehavior::collision_entered`](crate::action::ActionBehavior).
    pub fn probe_contacts(&mut self, radius: f32) {
        let actor = self.cx.actor;
        self.cx.outbox.probes.push(ContactProbe { actor, radius });
    }

    pub fn view(&self) -> InstanceView<'_> {
        InstanceView {
            def: self.def,
            data: self.data,
            time_started: self.time_started,
            now: self.cx.now,
            actions: self.cx.env.actions,
        }
    }
}
