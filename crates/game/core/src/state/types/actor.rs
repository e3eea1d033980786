use bitflags::bitflags;

use super::common::{ActorId, HitPoints, SimTime, Vec3};
use crate::action::ActionRequestData;
use crate::env::ClassId;

bitflags! {
    /// Static properties of an actor, fixed at spawn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActorTraits: u8 {
        /// Server-controlled character. Driven by an AI brain.
        const NPC             = 1 << 0;
        /// Can be picked up and carried.
        const HEAVY           = 1 << 1;
        /// Tramplers that hit this actor stun themselves.
        const STUN_ON_TRAMPLE = 1 << 2;
        /// Destructible prop (pots, crates). Damageable but never acts.
        const BREAKABLE       = 1 << 3;
    }
}

bitflags! {
    /// Collision layers used by spatial queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct QueryMask: u8 {
        const PCS   = 1 << 0;
        const NPCS  = 1 << 1;
        const HEAVY = 1 << 2;
    }
}

impl QueryMask {
    /// Layer selection for an attack: hit player characters when `want_pcs`,
    /// otherwise hit NPCs and breakables.
    pub fn foes(want_pcs: bool) -> Self {
        if want_pcs { Self::PCS } else { Self::NPCS }
    }
}

/// Whether an actor is up, knocked down, or gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeState {
    #[default]
    Alive,
    /// Player character at zero hit points. Can be revived.
    Fainted,
    /// NPC or breakable at zero hit points.
    Dead,
}

/// Current locomotion of an actor, integrated once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementState {
    #[default]
    Idle,
    PathTo {
        destination: Vec3,
    },
    /// Follows another actor until within `stop_distance`.
    Follow {
        target: ActorId,
        stop_distance: f32,
    },
    /// Forced forward charge at a fixed speed.
    Charge {
        speed: f32,
        until: SimTime,
    },
    /// Forced displacement away from an impact.
    Knockback {
        velocity: Vec3,
        until: SimTime,
    },
}

impl MovementState {
    pub fn is_forced(&self) -> bool {
        matches!(self, Self::Charge { .. } | Self::Knockback { .. })
    }
}

/// Authoritative server-side record of a single actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: ActorId,
    pub class: ClassId,
    pub traits: ActorTraits,
    pub position: Vec3,
    /// Facing on the horizontal plane. Never zero.
    pub forward: Vec3,
    pub hit_points: HitPoints,
    pub life_state: LifeState,
    pub is_stealthy: bool,
    pub target: Option<ActorId>,
    pub held_object: Option<ActorId>,
    pub movement: MovementState,
    pub move_speed: f32,
    /// Replicated copy of the request at the head of the action queue.
    pub active_action: Option<ActionRequestData>,
}

impl ActorState {
    pub fn new(id: ActorId, class: ClassId, traits: ActorTraits, max_hp: i32) -> Self {
        Self {
            id,
            class,
            traits,
            position: Vec3::ZERO,
            forward: Vec3::FORWARD,
            hit_points: HitPoints::full(max_hp),
            life_state: LifeState::Alive,
            is_stealthy: false,
            target: None,
            held_object: None,
            movement: MovementState::Idle,
            move_speed: 0.0,
            active_action: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn is_npc(&self) -> bool {
        self.traits.contains(ActorTraits::NPC)
    }

    pub fn is_alive(&self) -> bool {
        self.life_state == LifeState::Alive
    }

    /// Characters act and can be targeted by AI; props cannot.
    pub fn is_character(&self) -> bool {
        !self
            .traits
            .intersects(ActorTraits::BREAKABLE | ActorTraits::HEAVY)
    }

    /// Living actors on a damage layer can receive hit point changes.
    pub fn is_damageable(&self) -> bool {
        self.is_alive() && !self.traits.contains(ActorTraits::HEAVY)
    }

    /// Collision layer this actor occupies.
    pub fn layer(&self) -> QueryMask {
        if self.traits.contains(ActorTraits::HEAVY) {
            QueryMask::HEAVY
        } else if self
            .traits
            .intersects(ActorTraits::NPC | ActorTraits::BREAKABLE)
        {
            QueryMask::NPCS
        } else {
            QueryMask::PCS
        }
    }

    pub fn is_performing_forced_movement(&self) -> bool {
        self.movement.is_forced()
    }

    /// Turns to face `point` on the horizontal plane. No-op when already there.
    pub fn look_at(&mut self, point: Vec3) {
        if let Some(dir) = (point - self.position).flat().normalized() {
            self.forward = dir;
        }
    }

    /// Turns to face `direction` on the horizontal plane.
    pub fn face(&mut self, direction: Vec3) {
        if let Some(dir) = direction.flat().normalized() {
            self.forward = dir;
        }
    }
}
