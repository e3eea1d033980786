//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! sending gameplay requests, managing actors, and streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use boss_room_core::{
    ActionRequestData, ActorId, ClientRequest, SpawnRequest, TickReport, Vec3,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::snapshot::WorldSnapshot;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn call<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(command(reply_tx)).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queues a gameplay request. It takes effect at the start of the next tick.
    pub async fn submit(&self, request: ClientRequest) -> Result<()> {
        self.send(Command::Submit(request)).await
    }

    pub async fn play_action(&self, actor: ActorId, request: ActionRequestData) -> Result<()> {
        self.submit(ClientRequest::PlayAction { actor, request }).await
    }

    /// Decodes a request in its compact wire form and queues it for `actor`.
    ///
    /// Malformed frames are rejected here and never reach the worker.
    pub async fn play_encoded(&self, actor: ActorId, bytes: &[u8]) -> Result<()> {
        let request = ActionRequestData::decode(bytes)?;
        self.play_action(actor, request).await
    }

    pub async fn stop_charging_up(&self, actor: ActorId) -> Result<()> {
        self.submit(ClientRequest::StopChargingUp { actor }).await
    }

    pub async fn move_to(&self, actor: ActorId, destination: Vec3) -> Result<()> {
        self.submit(ClientRequest::MoveTo { actor, destination }).await
    }

    pub async fn spawn(&self, request: SpawnRequest) -> Result<ActorId> {
        self.call(|reply| Command::Spawn { request, reply }).await?
    }

    /// Cancels everything the actor runs and removes it from the world.
    pub async fn despawn(&self, actor: ActorId) -> Result<()> {
        self.call(|reply| Command::Despawn { actor, reply }).await?
    }

    /// Replicated state of every actor as of the last completed tick.
    pub async fn snapshot(&self) -> Result<WorldSnapshot> {
        self.call(|reply| Command::Snapshot { reply }).await
    }

    /// Runs one tick and returns what it produced.
    ///
    /// Fails with [`RuntimeError::AutoTickEnabled`] when the runtime ticks on
    /// its own timer.
    pub async fn step(&self) -> Result<TickReport> {
        self.call(|reply| Command::Step { reply }).await?
    }

    /// Runs `ticks` manual steps, discarding the reports.
    pub async fn step_n(&self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step().await?;
        }
        Ok(())
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Replication` - per-actor replicated changes
    /// - `Topic::Presentation` - action started, ended, cancelled, projectiles
    /// - `Topic::Tick` - one marker after each tick's other events
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
