//! Pooled, mutable runtime state of one playing action.

use std::sync::Arc;

use crate::action::logic::{ActionBehavior, LogicState};
use crate::action::{
    ActionContext, ActionDefinition, ActionId, ActionLogic, ActionRegistry, ActionRequestData,
    ActionRun, BuffableValue, Collision, GameplayActivity, InstanceView,
};
use crate::state::SimTime;

/// Where an instance is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InstancePhase {
    /// Sitting in the pool.
    #[default]
    Pooled,
    /// Acquired and queued, not yet started.
    Initialized,
    Started,
    /// `end` or `cancel` has run. Waiting to be released.
    Finished,
}

/// One play of an [`ActionDefinition`].
///
/// Instances are recycled by the [`ActionPool`](crate::action::ActionPool):
/// the definition and logic variant stay, everything else is reset on
/// release.
#[derive(Clone, Debug)]
pub struct ActionInstance {
    definition: Arc<ActionDefinition>,
    request: ActionRequestData,
    time_started: SimTime,
    logic: LogicState,
    phase: InstancePhase,
}

impl ActionInstance {
    pub(crate) fn new(definition: Arc<ActionDefinition>) -> Self {
        let logic = LogicState::for_logic(definition.logic);
        Self {
            definition,
            request: pooled_request(),
            time_started: pooled_time(),
            logic,
            phase: InstancePhase::Pooled,
        }
    }

    pub(crate) fn initialize(&mut self, request: ActionRequestData) {
        debug_assert_eq!(request.action_id, self.definition.id);
        self.request = request;
        self.time_started = SimTime::ZERO;
        self.phase = InstancePhase::Initialized;
    }

    /// Returns the instance to its pooled state. Definition and logic
    /// variant are kept.
    pub(crate) fn reset(&mut self) {
        self.request = pooled_request();
        self.time_started = pooled_time();
        self.logic.reset();
        self.phase = InstancePhase::Pooled;
    }

    /// True when nothing from a previous play survives.
    pub fn is_pristine(&self) -> bool {
        self.phase == InstancePhase::Pooled
            && self.logic.is_reset()
            && self.request == pooled_request()
            && self.time_started == pooled_time()
    }

    pub fn id(&self) -> ActionId {
        self.definition.id
    }

    pub fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    pub fn logic(&self) -> ActionLogic {
        self.definition.logic
    }

    pub fn request(&self) -> &ActionRequestData {
        &self.request
    }

    pub(crate) fn request_mut(&mut self) -> &mut ActionRequestData {
        &mut self.request
    }

    pub fn phase(&self) -> InstancePhase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        matches!(self.phase, InstancePhase::Started | InstancePhase::Finished)
    }

    pub fn time_started(&self) -> SimTime {
        self.time_started
    }

    pub(crate) fn set_time_started(&mut self, now: SimTime) {
        self.time_started = now;
    }

    pub fn elapsed(&self, now: SimTime) -> SimTime {
        now.saturating_sub(self.time_started)
    }

    /// Whether the sequencer should end this instance after its update.
    pub fn has_expired(&self, now: SimTime) -> bool {
        self.definition.is_expirable() && self.elapsed(now) >= self.definition.duration()
    }

    pub fn view<'v>(&'v self, now: SimTime, actions: &'v ActionRegistry) -> InstanceView<'v> {
        InstanceView {
            def: &self.definition,
            data: &self.request,
            time_started: self.time_started,
            now,
            actions,
        }
    }

    fn split<'r, 'a>(
        &'r mut self,
        cx: &'r mut ActionContext<'a>,
    ) -> (&'r mut LogicState, ActionRun<'r, 'a>) {
        let Self {
            definition,
            request,
            time_started,
            logic,
            ..
        } = self;
        let run = ActionRun {
            cx,
            def: definition,
            data: request,
            time_started: *time_started,
        };
        (logic, run)
    }

    pub(crate) fn start(&mut self, cx: &mut ActionContext<'_>) -> bool {
        self.phase = InstancePhase::Started;
        let (logic, mut run) = self.split(cx);
        logic.start(&mut run)
    }

    pub(crate) fn update(&mut self, cx: &mut ActionContext<'_>) -> bool {
        let (logic, mut run) = self.split(cx);
        logic.update(&mut run)
    }

    pub(crate) fn end(&mut self, cx: &mut ActionContext<'_>) {
        self.phase = InstancePhase::Finished;
        let (logic, mut run) = self.split(cx);
        logic.end(&mut run);
    }

    pub(crate) fn cancel(&mut self, cx: &mut ActionContext<'_>) {
        self.phase = InstancePhase::Finished;
        let (logic, mut run) = self.split(cx);
        logic.cancel(&mut run);
    }

    pub(crate) fn on_gameplay_activity(
        &mut self,
        cx: &mut ActionContext<'_>,
        activity: GameplayActivity,
    ) {
        let (logic, mut run) = self.split(cx);
        logic.on_gameplay_activity(&mut run, activity);
    }

    pub(crate) fn collision_entered(&mut self, cx: &mut ActionContext<'_>, collision: Collision) {
        let (logic, mut run) = self.split(cx);
        logic.collision_entered(&mut run, collision);
    }

    pub fn should_become_non_blocking(&self, now: SimTime, actions: &ActionRegistry) -> bool {
        self.logic
            .should_become_non_blocking(&self.view(now, actions))
    }

    pub fn buff_value(
        &self,
        now: SimTime,
        actions: &ActionRegistry,
        buff: BuffableValue,
        value: &mut f32,
    ) {
        self.logic.buff_value(&self.view(now, actions), buff, value);
    }

    pub fn chain_into_new_action(
        &self,
        now: SimTime,
        actions: &ActionRegistry,
    ) -> Option<ActionRequestData> {
        self.logic.chain_into_new_action(&self.view(now, actions))
    }
}

// Debug builds poison recycled instances so stale reads stand out.
#[cfg(debug_assertions)]
fn pooled_request() -> ActionRequestData {
    ActionRequestData::new(ActionId(u16::MAX))
}

#[cfg(not(debug_assertions))]
fn pooled_request() -> ActionRequestData {
    ActionRequestData::default()
}

#[cfg(debug_assertions)]
fn pooled_time() -> SimTime {
    SimTime(u64::MAX)
}

#[cfg(not(debug_assertions))]
fn pooled_time() -> SimTime {
    SimTime::ZERO
}
