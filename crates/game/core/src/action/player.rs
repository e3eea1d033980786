//! Per-actor action sequencer.
//!
//! Every character owns one [`ServerActionPlayer`]. It keeps a FIFO of
//! blocking actions whose head is the only one running, a set of
//! non-blocking actions that run in parallel with it, per-action cooldown
//! timestamps and at most one chained follow-up request.
//!
//! All entry points take the [`ActionContext`] of the owning actor: the
//! world to read and mutate, the registry, the pool instances come from and
//! the outbox effects go to.

use std::collections::{BTreeMap, VecDeque};

use crate::action::{
    ActionContext, ActionEvent, ActionId, ActionInstance, ActionLogic, ActionRegistry,
    ActionRequestData, BlockingMode, BuffableValue, Collision, GameplayActivity,
};
use crate::state::{ActorId, MovementState, SimTime};

#[derive(Clone, Debug)]
pub struct ServerActionPlayer {
    actor: ActorId,
    queue: VecDeque<ActionInstance>,
    non_blocking: Vec<ActionInstance>,
    last_used: BTreeMap<ActionId, SimTime>,
    pending: Option<ActionRequestData>,
}

impl ServerActionPlayer {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            queue: VecDeque::new(),
            non_blocking: Vec::new(),
            last_used: BTreeMap::new(),
            pending: None,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Accepts a request for this actor.
    ///
    /// A request that does not queue supersedes everything blocking. A queued
    /// request is dropped when the queue already holds too much blocking time.
    /// Unknown ids are logged and dropped.
    pub fn play_action(&mut self, request: ActionRequestData, cx: &mut ActionContext<'_>) {
        if !cx.actions().contains(request.action_id) {
            tracing::debug!(actor = %self.actor, action = %request.action_id, "unknown action requested");
            return;
        }
        if !request.should_queue {
            self.clear_actions(false, cx);
        }
        let depth = self.queue_time_depth(cx.now);
        if depth >= cx.env.config.max_queue_time_depth {
            tracing::debug!(
                actor = %self.actor,
                action = %request.action_id,
                depth,
                "action queue full, request discarded"
            );
            return;
        }
        let instance = match cx.pool.acquire(request) {
            Ok(instance) => instance,
            Err(err) => {
                tracing::warn!(actor = %self.actor, %err, "failed to acquire action instance");
                return;
            }
        };
        self.queue.push_back(instance);
        if self.queue.len() == 1 {
            self.start_action(cx);
        }
    }

    /// Cancels the blocking queue, and the non-blocking set as well when
    /// `cancel_non_blocking` is set.
    ///
    /// The cancelled head forgets its cooldown so it can be replayed at once.
    /// Queued actions that never started are released without callbacks.
    pub fn clear_actions(&mut self, cancel_non_blocking: bool, cx: &mut ActionContext<'_>) {
        if let Some(mut head) = self.queue.pop_front() {
            self.last_used.remove(&head.id());
            if head.has_started() {
                self.cancel_instance(&mut head, cx);
            }
            cx.pool.release(head);
        }
        for instance in self.queue.drain(..) {
            cx.pool.release(instance);
        }
        if cancel_non_blocking {
            for mut instance in std::mem::take(&mut self.non_blocking) {
                self.cancel_instance(&mut instance, cx);
                cx.pool.release(instance);
            }
            self.pending = None;
        }
    }

    /// Cancels running actions of `logic`.
    ///
    /// Non-blocking actions are checked newest first; without `cancel_all`
    /// only the first match goes. A matching head is cancelled too, and the
    /// queue moves on. Instances of `except` are spared.
    pub fn cancel_running_by_logic(
        &mut self,
        logic: ActionLogic,
        cancel_all: bool,
        except: Option<ActionId>,
        cx: &mut ActionContext<'_>,
    ) {
        let matches = |instance: &ActionInstance| {
            instance.logic() == logic && Some(instance.id()) != except
        };
        for i in (0..self.non_blocking.len()).rev() {
            if matches(&self.non_blocking[i]) {
                let mut instance = self.non_blocking.remove(i);
                self.cancel_instance(&mut instance, cx);
                cx.pool.release(instance);
                if !cancel_all {
                    return;
                }
            }
        }
        if self.queue.front().is_some_and(matches)
            && let Some(mut head) = self.queue.pop_front()
        {
            self.cancel_instance(&mut head, cx);
            cx.pool.release(head);
            if self.may_restart() {
                self.start_action(cx);
            }
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Plays the request chained by the last action that ended, if any.
    pub fn play_pending(&mut self, cx: &mut ActionContext<'_>) {
        if let Some(request) = self.pending.take() {
            self.play_action(request, cx);
        }
    }

    /// Advances everything this actor is doing by one tick.
    pub fn update(&mut self, cx: &mut ActionContext<'_>) {
        self.play_pending(cx);

        if self
            .queue
            .front()
            .is_some_and(|head| head.should_become_non_blocking(cx.now, cx.actions()))
        {
            self.demote_head(cx);
        }

        if let Some(head) = self.queue.front_mut() {
            let keep_going = head.update(cx) && !head.has_expired(cx.now);
            if !keep_going {
                self.advance_queue(true, cx);
            }
        }

        for i in (0..self.non_blocking.len()).rev() {
            let instance = &mut self.non_blocking[i];
            let keep_going = instance.update(cx) && !instance.has_expired(cx.now);
            if !keep_going {
                let mut instance = self.non_blocking.remove(i);
                self.end_instance(&mut instance, cx);
                cx.pool.release(instance);
            }
        }
    }

    /// Forwards an activity to the head and every non-blocking action.
    pub fn on_gameplay_activity(&mut self, activity: GameplayActivity, cx: &mut ActionContext<'_>) {
        if let Some(head) = self.queue.front_mut() {
            head.on_gameplay_activity(cx, activity);
        }
        for instance in &mut self.non_blocking {
            instance.on_gameplay_activity(cx, activity);
        }
    }

    /// Forwards a physical contact to the head only.
    pub fn collision_entered(&mut self, collision: Collision, cx: &mut ActionContext<'_>) {
        if let Some(head) = self.queue.front_mut() {
            head.collision_entered(cx, collision);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Request of the blocking head, if any.
    pub fn active_action_info(&self) -> Option<&ActionRequestData> {
        self.queue.front().map(ActionInstance::request)
    }

    pub fn running_action_count(&self) -> usize {
        self.non_blocking.len() + usize::from(!self.queue.is_empty())
    }

    pub fn queued_action_count(&self) -> usize {
        self.queue.len()
    }

    pub fn non_blocking_actions(&self) -> impl Iterator<Item = &ActionInstance> {
        self.non_blocking.iter()
    }

    pub fn has_pending_action(&self) -> bool {
        self.pending.is_some()
    }

    /// False while `id` is cooling down from its last successful start.
    pub fn is_reuse_time_elapsed(&self, id: ActionId, now: SimTime, actions: &ActionRegistry) -> bool {
        let Some(last_used) = self.last_used.get(&id) else {
            return true;
        };
        let Some(def) = actions.get(id) else {
            return true;
        };
        let reuse = def.reuse_time();
        reuse.is_zero() || now.saturating_sub(*last_used) >= reuse
    }

    /// `buff` after every running action has had its say.
    pub fn buffed_value(&self, buff: BuffableValue, now: SimTime, actions: &ActionRegistry) -> f32 {
        let mut value = buff.unbuffed();
        for instance in self.queue.front().into_iter().chain(&self.non_blocking) {
            instance.buff_value(now, actions, buff, &mut value);
        }
        value
    }

    /// Seconds of blocking work still queued, measured from now.
    pub fn queue_time_depth(&self, now: SimTime) -> f32 {
        let Some(head) = self.queue.front() else {
            return 0.0;
        };
        let total: f32 = self
            .queue
            .iter()
            .map(|instance| instance.definition().blocking_seconds())
            .sum();
        let running = if head.has_started() {
            head.elapsed(now).as_secs_f32()
        } else {
            0.0
        };
        total - running
    }

    // ========================================================================
    // Sequencing
    // ========================================================================

    /// Starts the head, discarding or retiring heads until one sticks or the
    /// queue runs dry.
    fn start_action(&mut self, cx: &mut ActionContext<'_>) {
        while let Some(head) = self.queue.front() {
            if !self.is_reuse_time_elapsed(head.id(), cx.now, cx.actions()) {
                tracing::debug!(actor = %self.actor, action = %head.id(), "action still cooling down");
                self.retire_head(false, cx);
                if !self.may_restart() {
                    return;
                }
                continue;
            }

            self.synthesize_target(cx);
            self.synthesize_chase(cx);

            if self.queue.front().is_some_and(|h| h.logic() == ActionLogic::Target) {
                self.cancel_non_blocking_by_logic(ActionLogic::Target, cx);
            }

            let actor = self.actor;
            let Some(head) = self.queue.front_mut() else {
                return;
            };
            head.set_time_started(cx.now);
            cx.outbox.events.push(ActionEvent::Started {
                actor,
                request: head.request().clone(),
            });

            if !head.start(cx) {
                self.retire_head(true, cx);
                if !self.may_restart() {
                    return;
                }
                continue;
            }

            let def = head.definition();
            let id = def.id;
            let instant_non_blocking = def.exec_time().is_zero()
                && def.blocking_mode == BlockingMode::OnlyDuringExecTime;
            if def.interruptible
                && let Some(me) = cx.world.actor_mut(actor)
                && !me.is_performing_forced_movement()
            {
                me.movement = MovementState::Idle;
            }
            self.last_used.insert(id, cx.now);

            if !instant_non_blocking {
                return;
            }
            // Demote in place; the loop starts the next head.
            if let Some(head) = self.queue.pop_front() {
                self.non_blocking.push(head);
            }
            if !self.may_restart() {
                return;
            }
        }
    }

    /// Moves the head to the non-blocking set and starts the next one.
    fn demote_head(&mut self, cx: &mut ActionContext<'_>) {
        if let Some(head) = self.queue.pop_front() {
            self.non_blocking.push(head);
        }
        if self.may_restart() {
            self.start_action(cx);
        }
    }

    fn advance_queue(&mut self, call_end: bool, cx: &mut ActionContext<'_>) {
        self.retire_head(call_end, cx);
        if self.may_restart() {
            self.start_action(cx);
        }
    }

    /// Pops and releases the head, ending it first when `call_end` is set.
    fn retire_head(&mut self, call_end: bool, cx: &mut ActionContext<'_>) {
        let Some(mut head) = self.queue.pop_front() else {
            return;
        };
        if call_end {
            self.end_instance(&mut head, cx);
        }
        cx.pool.release(head);
    }

    /// A pending chained request that supersedes keeps the queue idle until
    /// it is played.
    fn may_restart(&self) -> bool {
        self.pending.as_ref().is_none_or(|request| request.should_queue)
    }

    fn end_instance(&mut self, instance: &mut ActionInstance, cx: &mut ActionContext<'_>) {
        instance.end(cx);
        cx.outbox.events.push(ActionEvent::Ended {
            actor: self.actor,
            action: instance.id(),
        });
        if let Some(next) = instance.chain_into_new_action(cx.now, cx.actions()) {
            self.pending = Some(next);
        }
    }

    fn cancel_instance(&self, instance: &mut ActionInstance, cx: &mut ActionContext<'_>) {
        instance.cancel(cx);
        cx.outbox.events.push(ActionEvent::Cancelled {
            actor: self.actor,
            action: instance.id(),
        });
    }

    fn cancel_non_blocking_by_logic(&mut self, logic: ActionLogic, cx: &mut ActionContext<'_>) {
        for i in (0..self.non_blocking.len()).rev() {
            if self.non_blocking[i].logic() == logic {
                let mut instance = self.non_blocking.remove(i);
                self.cancel_instance(&mut instance, cx);
                cx.pool.release(instance);
            }
        }
    }

    /// Inserts a Target action ahead of a single-target head whose target is
    /// not the actor's current one.
    fn synthesize_target(&mut self, cx: &mut ActionContext<'_>) {
        let Some(general_target) = cx.actions().general_target() else {
            return;
        };
        let Some(head) = self.queue.front() else {
            return;
        };
        if matches!(head.logic(), ActionLogic::Target | ActionLogic::Chase) {
            return;
        }
        let [target] = head.request().targets() else {
            return;
        };
        let target = *target;
        if cx.me().is_some_and(|me| me.target == Some(target)) {
            return;
        }
        let request = ActionRequestData::new(general_target).with_target(target);
        match cx.pool.acquire(request) {
            Ok(instance) => self.queue.push_front(instance),
            Err(err) => tracing::warn!(actor = %self.actor, %err, "cannot synthesize target action"),
        }
    }

    /// Inserts a Chase ahead of the first non-Target action when it asked to
    /// close in and its first target is out of range.
    fn synthesize_chase(&mut self, cx: &mut ActionContext<'_>) {
        let index = usize::from(
            self.queue.len() > 1
                && self.queue.front().is_some_and(|h| h.logic() == ActionLogic::Target),
        );
        let Some(base) = self.queue.get(index) else {
            return;
        };
        let request = base.request();
        if !request.should_close {
            return;
        }
        let Some(target) = request.first_target() else {
            return;
        };
        let range = base.definition().range;
        let (Some(me), Some(there)) = (cx.world.position(self.actor), cx.world.position(target))
        else {
            return;
        };
        if range * range > me.flat_distance_squared(there) {
            return;
        }

        let chase = ActionRequestData::new(cx.actions().general_chase())
            .with_targets(request.targets().iter().copied())
            .with_amount(range);
        match cx.pool.acquire(chase) {
            Ok(instance) => {
                if let Some(base) = self.queue.get_mut(index) {
                    base.request_mut().should_close = false;
                }
                self.queue.insert(index, instance);
            }
            Err(err) => tracing::warn!(actor = %self.actor, %err, "cannot synthesize chase action"),
        }
    }
}
