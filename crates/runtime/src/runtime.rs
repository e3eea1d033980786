//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up the command channel and
//! the event bus, and exposes a builder-based API for hosts.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use boss_room_content::Content;
use boss_room_core::{
    ActionRegistry, ClassOracle, GameConfig, GameEngine, NaiveSpatialOracle, PcgRng, RngOracle,
    SpatialOracle,
};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Capacity of each topic's broadcast channel.
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Tick on a fixed-rate timer. When false, ticks only run through
    /// [`RuntimeHandle::step`].
    pub auto_tick: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 64,
            auto_tick: true,
        }
    }
}

/// Main runtime that orchestrates the simulation
///
/// [`RuntimeHandle`] is the cloneable façade clients use to talk to it.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shuts down gracefully.
    ///
    /// The worker stops once every handle, including clones held elsewhere,
    /// has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    actions: Option<Arc<ActionRegistry>>,
    classes: Option<Arc<dyn ClassOracle>>,
    spatial: Option<Arc<dyn SpatialOracle>>,
    rng: Option<Arc<dyn RngOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            actions: None,
            classes: None,
            spatial: None,
            rng: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses loaded content for actions, classes and the game config.
    pub fn content(mut self, content: Content) -> Self {
        self.config.game_config = content.config;
        self.actions = Some(Arc::new(content.actions));
        self.classes = Some(Arc::new(content.classes));
        self
    }

    pub fn actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = Some(Arc::new(actions));
        self
    }

    pub fn classes(mut self, classes: impl ClassOracle + 'static) -> Self {
        self.classes = Some(Arc::new(classes));
        self
    }

    /// Defaults to [`NaiveSpatialOracle`].
    pub fn spatial(mut self, spatial: impl SpatialOracle + 'static) -> Self {
        self.spatial = Some(Arc::new(spatial));
        self
    }

    /// Defaults to [`PcgRng`].
    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Arc::new(rng));
        self
    }

    pub fn auto_tick(mut self, enable: bool) -> Self {
        self.config.auto_tick = enable;
        self
    }

    /// Build the runtime and start its worker.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let (Some(actions), Some(classes)) = (self.actions, self.classes) else {
            return Err(RuntimeError::MissingContent);
        };
        let spatial = self
            .spatial
            .unwrap_or_else(|| Arc::new(NaiveSpatialOracle) as Arc<dyn SpatialOracle>);
        let rng = self
            .rng
            .unwrap_or_else(|| Arc::new(PcgRng) as Arc<dyn RngOracle>);

        let engine = GameEngine::builder()
            .actions(actions)
            .classes(classes)
            .spatial(spatial)
            .rng(rng)
            .config(self.config.game_config.clone())
            .build()?;

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker =
            SimulationWorker::new(engine, command_rx, event_bus, self.config.auto_tick);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        tracing::info!(
            tick_rate_hz = self.config.game_config.tick_rate_hz,
            auto_tick = self.config.auto_tick,
            "runtime started"
        );

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
