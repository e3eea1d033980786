//! Simulation worker that owns the authoritative [`GameEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), feeds them
//! to the engine between ticks, and publishes every tick's results to the
//! [`EventBus`].

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};

use boss_room_core::{ActorId, ClientRequest, GameEngine, SpawnRequest, TickReport};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, PresentationEvent, ReplicationEvent, TickEvent};
use crate::snapshot::WorldSnapshot;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Gameplay request, queued by the engine until the next tick.
    Submit(ClientRequest),
    Spawn {
        request: SpawnRequest,
        reply: oneshot::Sender<Result<ActorId>>,
    },
    Despawn {
        actor: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<WorldSnapshot>,
    },
    /// Runs exactly one tick. Manual mode only.
    Step {
        reply: oneshot::Sender<Result<TickReport>>,
    },
}

/// Background task that processes commands and drives ticks.
pub struct SimulationWorker {
    engine: GameEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    /// Fixed tick period, or `None` when ticks are driven by [`Command::Step`].
    period: Option<Duration>,
}

impl SimulationWorker {
    pub fn new(
        engine: GameEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        auto_tick: bool,
    ) -> Self {
        let period = auto_tick
            .then(|| Duration::from_micros(engine.config().tick_interval_micros()));
        Self {
            engine,
            command_rx,
            event_bus,
            period,
        }
    }

    /// Main worker loop. Returns once every handle has been dropped.
    pub async fn run(mut self) {
        match self.period {
            Some(period) => self.run_fixed_rate(period).await,
            None => self.run_manual().await,
        }
        tracing::debug!(
            target: "runtime::worker",
            tick = self.engine.current_tick(),
            "simulation worker stopped"
        );
    }

    async fn run_fixed_rate(&mut self, period: Duration) {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Commands are only taken at a tick boundary, never mid-tick.
            if !self.drain_commands() {
                break;
            }
            self.advance();
        }
    }

    async fn run_manual(&mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
    }

    /// Applies every queued command. Returns false once the channel is closed.
    fn drain_commands(&mut self) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(cmd) => self.handle_command(cmd),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(request) => {
                tracing::trace!(target: "runtime::worker", actor = %request.actor(), "request queued");
                self.engine.submit(request);
            }
            Command::Spawn { request, reply } => {
                let result = self.engine.spawn_actor(request).map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::Despawn { actor, reply } => {
                let result = self.engine.despawn_actor(actor).map_err(RuntimeError::from);
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(WorldSnapshot::capture(&self.engine));
            }
            Command::Step { reply } => {
                let result = if self.period.is_some() {
                    Err(RuntimeError::AutoTickEnabled)
                } else {
                    Ok(self.advance())
                };
                let _ = reply.send(result);
            }
        }
    }

    fn advance(&mut self) -> TickReport {
        let report = self.engine.tick();
        self.publish(&report);
        report
    }

    fn publish(&self, report: &TickReport) {
        let tick = report.tick;
        for delta in &report.deltas {
            self.event_bus.publish(Event::Replication(ReplicationEvent {
                tick,
                delta: delta.clone(),
            }));
        }
        for event in &report.events {
            self.event_bus.publish(Event::Presentation(PresentationEvent {
                tick,
                event: event.clone(),
            }));
        }
        self.event_bus.publish(Event::Tick(TickEvent {
            tick,
            now: report.now,
            deltas: report.deltas.len(),
            events: report.events.len(),
        }));
    }
}
