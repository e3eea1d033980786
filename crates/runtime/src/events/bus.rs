//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{PresentationEvent, ReplicationEvent, TickEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Per-actor replicated state changes
    Replication,
    /// Action cues for whoever renders the session
    Presentation,
    /// Tick boundaries
    Tick,
}

/// Event wrapper that carries the topic and typed payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Replication(ReplicationEvent),
    Presentation(PresentationEvent),
    Tick(TickEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Replication(_) => Topic::Replication,
            Event::Presentation(_) => Topic::Presentation,
            Event::Tick(_) => Topic::Tick,
        }
    }
}

/// Topic-based event bus
///
/// One broadcast channel per topic, created up front. Publishing is
/// best-effort: a topic without subscribers drops the event, and lagging
/// subscribers lose the oldest entries.
#[derive(Clone)]
pub struct EventBus {
    replication: broadcast::Sender<Event>,
    presentation: broadcast::Sender<Event>,
    tick: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a bus whose channels each buffer `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            replication: broadcast::channel(capacity).0,
            presentation: broadcast::channel(capacity).0,
            tick: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Replication => &self.replication,
            Topic::Presentation => &self.presentation,
            Topic::Tick => &self.tick,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!(?topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("replication", &self.replication.receiver_count())
            .field("presentation", &self.presentation.receiver_count())
            .field("tick", &self.tick.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boss_room_core::SimTime;

    fn tick_event(tick: u64) -> Event {
        Event::Tick(TickEvent {
            tick,
            now: SimTime::ZERO,
            deltas: 0,
            events: 0,
        })
    }

    #[test]
    fn events_only_reach_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut ticks = bus.subscribe(Topic::Tick);
        let mut cues = bus.subscribe(Topic::Presentation);

        bus.publish(tick_event(1));

        assert_eq!(ticks.try_recv().unwrap(), tick_event(1));
        assert!(cues.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(tick_event(1));
        assert_eq!(bus.subscriber_count(Topic::Tick), 0);
    }
}
