//! Fixed-step simulation of one encounter.
//!
//! The [`GameEngine`] owns every piece of mutable simulation state (world,
//! instance pool, one action player per character, one brain per NPC) and
//! the oracles it reads. Hosts feed it [`ClientRequest`]s and call
//! [`GameEngine::tick`]; each tick returns the replication deltas and
//! presentation events it produced.
//!
//! Within a tick, work runs in a fixed order:
//!
//! 1. advance the clock
//! 2. apply queued client requests
//! 3. play follow-up actions chained by last tick's endings
//! 4. think for every living NPC
//! 5. update every action player in ascending actor order
//! 6. integrate movement and deliver charge collisions
//! 7. publish head actions and drain replication deltas
//!
//! Deferred effects are resolved right after the actor that queued them.

mod errors;
mod movement;
mod stage;

pub use errors::SpawnError;

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use crate::action::{
    ActionEvent, ActionPool, ActionRegistry, ActionRequestData, Outbox, ServerActionPlayer,
    WireError,
};
use crate::ai::AiBrain;
use crate::config::GameConfig;
use crate::env::{ClassId, ClassOracle, Env, OracleError, RngOracle, SpatialOracle};
use crate::state::{
    ActorId, ActorState, ReplicationDelta, SimClock, SimTime, StateError, Vec3, World,
};
use stage::Stage;

/// Input from a connected client (or a host acting on its behalf).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientRequest {
    PlayAction {
        actor: ActorId,
        request: ActionRequestData,
    },
    /// Releases a charge-up early.
    StopChargingUp { actor: ActorId },
    /// Walks toward a point, interrupting whatever can be interrupted.
    MoveTo { actor: ActorId, destination: Vec3 },
}

impl ClientRequest {
    pub fn actor(&self) -> ActorId {
        match self {
            Self::PlayAction { actor, .. }
            | Self::StopChargingUp { actor }
            | Self::MoveTo { actor, .. } => *actor,
        }
    }
}

/// Where and as what a new actor enters the encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnRequest {
    pub class: ClassId,
    pub position: Vec3,
    /// Initial facing. `None` keeps the default forward.
    pub facing: Option<Vec3>,
}

impl SpawnRequest {
    pub fn new(class: ClassId, position: Vec3) -> Self {
        Self {
            class,
            position,
            facing: None,
        }
    }

    pub fn facing(mut self, direction: Vec3) -> Self {
        self.facing = Some(direction);
        self
    }
}

/// Everything one tick produced for the outside world.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub tick: u64,
    pub now: SimTime,
    pub deltas: Vec<ReplicationDelta>,
    pub events: Vec<ActionEvent>,
}

/// Authoritative simulation context.
pub struct GameEngine {
    world: World,
    actions: Arc<ActionRegistry>,
    classes: Arc<dyn ClassOracle>,
    spatial: Arc<dyn SpatialOracle>,
    rng: Arc<dyn RngOracle>,
    config: GameConfig,
    pool: ActionPool,
    players: BTreeMap<ActorId, ServerActionPlayer>,
    brains: BTreeMap<ActorId, AiBrain>,
    clock: SimClock,
    inbound: VecDeque<ClientRequest>,
    outbox: Outbox,
    next_actor: u64,
}

impl GameEngine {
    pub fn builder() -> GameEngineBuilder {
        GameEngineBuilder::default()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    pub fn pool(&self) -> &ActionPool {
        &self.pool
    }

    pub fn player(&self, actor: ActorId) -> Option<&ServerActionPlayer> {
        self.players.get(&actor)
    }

    pub fn brain(&self, actor: ActorId) -> Option<&AiBrain> {
        self.brains.get(&actor)
    }

    pub fn brain_mut(&mut self, actor: ActorId) -> Option<&mut AiBrain> {
        self.brains.get_mut(&actor)
    }

    /// Number of requests waiting for the next tick.
    pub fn pending_requests(&self) -> usize {
        self.inbound.len()
    }

    fn stage(&mut self) -> Stage<'_> {
        Stage {
            world: &mut self.world,
            pool: &mut self.pool,
            players: &mut self.players,
            brains: &mut self.brains,
            outbox: &mut self.outbox,
            env: Env::new(
                &self.actions,
                &*self.classes,
                &*self.spatial,
                &*self.rng,
                &self.config,
            ),
            now: self.clock.now(),
            tick: self.clock.tick(),
        }
    }

    /// Spawns an actor of the requested class with a fresh handle.
    ///
    /// Characters get an action player; NPC characters also get a brain.
    /// Breakables and heavy props get neither.
    pub fn spawn_actor(&mut self, spawn: SpawnRequest) -> Result<ActorId, SpawnError> {
        let class = self
            .classes
            .class(spawn.class)
            .ok_or(OracleError::ClassNotFound(spawn.class))?;

        let id = ActorId(self.next_actor);
        let speed = class.move_speed.unwrap_or(self.config.default_move_speed);
        let mut actor = ActorState::new(id, class.id, class.spawn_traits(), class.base_hp)
            .with_position(spawn.position)
            .with_move_speed(speed);
        if let Some(facing) = spawn.facing {
            actor.face(facing);
        }
        let is_character = actor.is_character();
        let is_npc = actor.is_npc();
        let brain = (is_character && is_npc).then(|| AiBrain::new(id, class));
        let name = class.name.clone();

        self.world.insert(actor)?;
        self.next_actor += 1;
        if is_character {
            self.players.insert(id, ServerActionPlayer::new(id));
        }
        if let Some(brain) = brain {
            self.brains.insert(id, brain);
        }
        tracing::info!(actor = %id, class = %name, "spawned");
        Ok(id)
    }

    /// Cancels everything the actor runs and removes it from the world.
    ///
    /// Every pooled instance it held is returned before this returns.
    pub fn despawn_actor(&mut self, actor: ActorId) -> Result<(), SpawnError> {
        if !self.world.contains(actor) {
            return Err(StateError::ActorNotFound(actor).into());
        }
        self.stage().retire(actor);
        self.players.remove(&actor);
        self.brains.remove(&actor);
        self.inbound.retain(|request| request.actor() != actor);
        self.world.remove(actor)?;
        tracing::info!(%actor, "despawned");
        Ok(())
    }

    /// Queues a client request for the start of the next tick.
    pub fn submit(&mut self, request: ClientRequest) {
        self.inbound.push_back(request);
    }

    /// Decodes a compact wire request and queues it for `actor`.
    pub fn submit_encoded(&mut self, actor: ActorId, bytes: &[u8]) -> Result<(), WireError> {
        let request = ActionRequestData::decode(bytes)?;
        self.submit(ClientRequest::PlayAction { actor, request });
        Ok(())
    }

    /// Advances the simulation by one fixed step.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.advance();
        let tick = self.clock.tick();
        let dt = self.clock.interval().as_secs_f32();
        let span = tracing::trace_span!("tick", tick, %now);
        let _guard = span.enter();

        let inbound: Vec<ClientRequest> = self.inbound.drain(..).collect();
        let mut stage = self.stage();
        for request in inbound {
            stage.handle_request(request);
        }
        stage.play_pending();
        stage.run_brains();
        stage.run_players();
        stage.integrate_movement(dt);
        stage.publish_active_actions();

        TickReport {
            tick,
            now,
            deltas: self.world.drain_deltas(),
            events: std::mem::take(&mut self.outbox.events),
        }
    }

    /// Runs ticks until the clock reaches `until`, concatenating reports.
    pub fn run_until(&mut self, until: SimTime) -> Vec<TickReport> {
        let mut reports = Vec::new();
        while self.clock.now() < until {
            reports.push(self.tick());
        }
        reports
    }
}

impl core::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEngine")
            .field("now", &self.clock.now())
            .field("actors", &self.world.len())
            .field("players", &self.players.len())
            .field("brains", &self.brains.len())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`GameEngine`] from its oracles.
#[derive(Default)]
pub struct GameEngineBuilder {
    actions: Option<Arc<ActionRegistry>>,
    classes: Option<Arc<dyn ClassOracle>>,
    spatial: Option<Arc<dyn SpatialOracle>>,
    rng: Option<Arc<dyn RngOracle>>,
    config: GameConfig,
}

impl GameEngineBuilder {
    pub fn actions(mut self, actions: Arc<ActionRegistry>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn classes(mut self, classes: Arc<dyn ClassOracle>) -> Self {
        self.classes = Some(classes);
        self
    }

    pub fn spatial(mut self, spatial: Arc<dyn SpatialOracle>) -> Self {
        self.spatial = Some(spatial);
        self
    }

    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<GameEngine, OracleError> {
        let actions = self.actions.ok_or(OracleError::ActionsNotAvailable)?;
        let classes = self.classes.ok_or(OracleError::ClassesNotAvailable)?;
        let spatial = self.spatial.ok_or(OracleError::SpatialNotAvailable)?;
        let rng = self.rng.ok_or(OracleError::RngNotAvailable)?;
        let interval = SimTime::from_micros(self.config.tick_interval_micros());

        Ok(GameEngine {
            world: World::new(),
            pool: ActionPool::new(&actions),
            actions,
            classes,
            spatial,
            rng,
            config: self.config,
            players: BTreeMap::new(),
            brains: BTreeMap::new(),
            clock: SimClock::new(interval),
            inbound: VecDeque::new(),
            outbox: Outbox::default(),
            next_actor: 1,
        })
    }
}
