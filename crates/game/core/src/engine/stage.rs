//! One tick's worth of mutable access to the simulation.
//!
//! A [`Stage`] borrows every part of the engine a tick touches and hands
//! out per-actor [`ActionContext`]s. Deferred effects queued by logics are
//! resolved here, right after the actor that queued them.

use std::collections::BTreeMap;

use super::ClientRequest;
use super::movement;
use crate::action::{
    ActionContext, ActionEffect, ActionLogic, ActionPool, BuffableValue, Collision, ContactProbe,
    GameplayActivity, Outbox, ServerActionPlayer,
};
use crate::ai::AiBrain;
use crate::env::Env;
use crate::state::{
    ActorId, ActorState, ActorTraits, LifeState, MovementState, QueryMask, SimTime, World,
};

/// Effects can cascade (a cancel that launches, a hit that stuns); a chain
/// this long means two logics keep feeding each other.
const MAX_RESOLVE_ROUNDS: usize = 32;

pub(super) struct Stage<'e> {
    pub world: &'e mut World,
    pub pool: &'e mut ActionPool,
    pub players: &'e mut BTreeMap<ActorId, ServerActionPlayer>,
    pub brains: &'e mut BTreeMap<ActorId, AiBrain>,
    pub outbox: &'e mut Outbox,
    pub env: Env<'e>,
    pub now: SimTime,
    pub tick: u64,
}

impl Stage<'_> {
    fn with_player<R>(
        &mut self,
        actor: ActorId,
        f: impl FnOnce(&mut ServerActionPlayer, &mut ActionContext<'_>) -> R,
    ) -> Option<R> {
        let player = self.players.get_mut(&actor)?;
        let mut cx = ActionContext {
            actor,
            now: self.now,
            tick: self.tick,
            world: &mut *self.world,
            env: self.env,
            pool: &mut *self.pool,
            outbox: &mut *self.outbox,
        };
        Some(f(player, &mut cx))
    }

    fn with_brain<R>(
        &mut self,
        actor: ActorId,
        f: impl FnOnce(&mut AiBrain, &mut ServerActionPlayer, &mut ActionContext<'_>) -> R,
    ) -> Option<R> {
        let brain = self.brains.get_mut(&actor)?;
        let player = self.players.get_mut(&actor)?;
        let mut cx = ActionContext {
            actor,
            now: self.now,
            tick: self.tick,
            world: &mut *self.world,
            env: self.env,
            pool: &mut *self.pool,
            outbox: &mut *self.outbox,
        };
        Some(f(brain, player, &mut cx))
    }

    fn buffed(&self, actor: ActorId, buff: BuffableValue) -> f32 {
        self.players
            .get(&actor)
            .map_or(buff.unbuffed(), |p| p.buffed_value(buff, self.now, self.env.actions))
    }

    fn can_act(&self, actor: ActorId) -> bool {
        self.world
            .actor(actor)
            .is_some_and(|a| a.is_alive() && !a.is_performing_forced_movement())
    }

    // ========================================================================
    // Phases
    // ========================================================================

    pub fn handle_request(&mut self, request: ClientRequest) {
        match request {
            ClientRequest::PlayAction { actor, request } => {
                if !self.can_act(actor) {
                    tracing::debug!(%actor, "play request dropped, actor cannot act");
                    return;
                }
                let Some(def) = self.env.actions.get(request.action_id) else {
                    tracing::debug!(%actor, action = %request.action_id, "play request for unknown action");
                    return;
                };
                let hostile = !def.is_friendly;
                if request.cancel_movement
                    && let Some(me) = self.world.actor_mut(actor)
                {
                    me.movement = MovementState::Idle;
                }
                self.with_player(actor, |player, cx| {
                    if hostile {
                        player.on_gameplay_activity(GameplayActivity::UsingAttackAction, cx);
                    }
                    player.play_action(request, cx);
                });
            }
            ClientRequest::StopChargingUp { actor } => {
                self.with_player(actor, |player, cx| {
                    player.on_gameplay_activity(GameplayActivity::StoppedChargingUp, cx);
                });
            }
            ClientRequest::MoveTo { actor, destination } => {
                if !self.can_act(actor) {
                    tracing::debug!(%actor, "move request dropped, actor cannot act");
                    return;
                }
                let actions = self.env.actions;
                self.with_player(actor, |player, cx| {
                    let interruptible = player
                        .active_action_info()
                        .and_then(|head| actions.get(head.action_id))
                        .is_some_and(|def| def.interruptible);
                    if interruptible {
                        player.clear_actions(false, cx);
                    }
                    player.cancel_running_by_logic(ActionLogic::Target, true, None, cx);
                });
                if let Some(me) = self.world.actor_mut(actor) {
                    me.movement = MovementState::PathTo { destination };
                }
            }
        }
        self.resolve();
    }

    pub fn play_pending(&mut self) {
        let ids: Vec<ActorId> = self.players.keys().copied().collect();
        for id in ids {
            self.with_player(id, |player, cx| player.play_pending(cx));
            self.resolve();
        }
    }

    pub fn run_brains(&mut self) {
        let ids: Vec<ActorId> = self.brains.keys().copied().collect();
        for id in ids {
            if !self.world.actor(id).is_some_and(ActorState::is_alive) {
                continue;
            }
            self.with_brain(id, |brain, player, cx| brain.update(player, cx));
            self.resolve();
        }
    }

    pub fn run_players(&mut self) {
        let ids: Vec<ActorId> = self.players.keys().copied().collect();
        for id in ids {
            self.with_player(id, |player, cx| player.update(cx));
            self.resolve();
        }
    }

    pub fn integrate_movement(&mut self, dt: f32) {
        let touch = self.env.config.physical_touch_distance;
        for id in self.world.ids() {
            let Some(actor) = self.world.actor(id) else {
                continue;
            };
            if actor.movement == MovementState::Idle {
                continue;
            }
            let held = actor.held_object;
            let step = movement::advance(actor, self.world, self.now, dt);
            let charging = matches!(step.movement, MovementState::Charge { .. });

            if let Some(me) = self.world.actor_mut(id) {
                me.movement = step.movement;
                if let Some(facing) = step.facing {
                    me.face(facing);
                }
            }
            self.world.set_position(id, step.position);
            if let Some(held) = held {
                self.world.set_position(held, step.position);
            }
            if charging {
                self.probe(ContactProbe {
                    actor: id,
                    radius: touch,
                });
            }
        }
        self.resolve();
    }

    /// Copies each player's head request into the replicated actor state.
    pub fn publish_active_actions(&mut self) {
        for (id, player) in self.players.iter() {
            self.world
                .set_active_action(*id, player.active_action_info().cloned());
        }
    }

    /// Cancels everything an actor is doing ahead of its removal.
    pub fn retire(&mut self, actor: ActorId) {
        self.with_player(actor, |player, cx| player.clear_actions(true, cx));
        self.resolve();
        let holders: Vec<ActorId> = self
            .world
            .actors()
            .filter(|a| a.held_object == Some(actor))
            .map(|a| a.id)
            .collect();
        for holder in holders {
            self.world.set_held_object(holder, None);
        }
    }

    // ========================================================================
    // Deferred effects
    // ========================================================================

    pub fn resolve(&mut self) {
        for _ in 0..MAX_RESOLVE_ROUNDS {
            let effects = std::mem::take(&mut self.outbox.effects);
            let probes = std::mem::take(&mut self.outbox.probes);
            if effects.is_empty() && probes.is_empty() {
                return;
            }
            for effect in effects {
                self.apply(effect);
            }
            for probe in probes {
                self.probe(probe);
            }
        }
        tracing::warn!(tick = self.tick, "effect resolution did not settle");
    }

    fn apply(&mut self, effect: ActionEffect) {
        match effect {
            ActionEffect::HitPoints {
                source,
                target,
                delta,
            } => self.receive_hp(source, target, delta),
            ActionEffect::Revive {
                target, hit_points, ..
            } => {
                if self
                    .world
                    .actor(target)
                    .is_some_and(|a| a.life_state == LifeState::Fainted)
                {
                    self.world.set_hit_points(target, hit_points);
                    self.world.set_life_state(target, LifeState::Alive);
                    tracing::debug!(%target, hit_points, "revived");
                }
            }
            ActionEffect::Knockback {
                target,
                origin,
                speed,
                duration,
                ..
            } => {
                let until = self.now + duration;
                if let Some(victim) = self.world.actor_mut(target)
                    && victim.is_alive()
                    && victim.is_character()
                {
                    let away = (victim.position - origin)
                        .flat()
                        .normalized()
                        .unwrap_or(-victim.forward);
                    victim.movement = MovementState::Knockback {
                        velocity: away * speed,
                        until,
                    };
                }
            }
        }
    }

    fn receive_hp(&mut self, source: ActorId, target: ActorId, delta: i32) {
        let Some(victim) = self.world.actor(target) else {
            return;
        };
        if !victim.is_alive() {
            return;
        }
        let falls_dead = victim
            .traits
            .intersects(ActorTraits::NPC | ActorTraits::BREAKABLE);

        let (activity, buff) = if delta > 0 {
            (GameplayActivity::Healed, BuffableValue::PercentHealingReceived)
        } else {
            (GameplayActivity::AttackedByEnemy, BuffableValue::PercentDamageReceived)
        };
        self.with_player(target, |player, cx| player.on_gameplay_activity(activity, cx));
        let delta = (delta as f32 * self.buffed(target, buff)) as i32;

        let Some(hit_points) = self.world.apply_hit_points(target, delta) else {
            return;
        };
        if let Some(brain) = self.brains.get_mut(&target) {
            brain.receive_hp(Some(source), delta);
        }
        if hit_points.is_depleted() {
            let state = if falls_dead {
                LifeState::Dead
            } else {
                LifeState::Fainted
            };
            self.change_life_state(target, state);
        }
    }

    fn change_life_state(&mut self, target: ActorId, state: LifeState) {
        self.world.set_life_state(target, state);
        if state == LifeState::Alive {
            return;
        }
        tracing::debug!(%target, ?state, "actor went down");
        self.with_player(target, |player, cx| player.clear_actions(true, cx));
        if let Some(victim) = self.world.actor_mut(target) {
            victim.movement = MovementState::Idle;
        }
    }

    /// Delivers everything touching `probe.actor` as collisions to its head
    /// action.
    fn probe(&mut self, probe: ContactProbe) {
        let Some(center) = self.world.position(probe.actor) else {
            return;
        };
        let hits = self.env.spatial.overlap_sphere(
            self.world,
            center,
            probe.radius,
            QueryMask::PCS | QueryMask::NPCS,
        );
        for other in hits {
            if other == probe.actor {
                continue;
            }
            let collision = Collision {
                other,
                chance_to_stun: self.buffed(other, BuffableValue::ChanceToStunTramplers),
            };
            self.with_player(probe.actor, |player, cx| {
                player.collision_entered(collision, cx);
            });
        }
    }
}
