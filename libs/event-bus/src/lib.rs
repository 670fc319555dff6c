use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use flume::Sender;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Type alias for subscriber registry to avoid type complexity warning
type SubscriberRegistry<E> =
    Arc<RwLock<HashMap<String, Vec<Sender<DomainEvent<E>>>>>>;

/// In-process pub/sub bus carrying upstream change notifications to their
/// handlers. Each subscriber gets its own flume channel and task; a dead
/// subscriber is logged and skipped, never blocks delivery to the rest.
#[derive(Clone)]
pub struct EventBus<E> {
    /// Subscriber registry for event routing
    subscribers: SubscriberRegistry<E>,

    /// Delivery metrics
    metrics: Arc<EventBusMetrics>,
}

/// Event wrapper with metadata for tracing and routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent<E> {
    pub id: Uuid,
    pub event_type: String,
    pub aggregate_id: String,
    pub timestamp: u64,
    pub payload: E,
}

/// Metrics for monitoring event throughput
#[derive(Default)]
pub struct EventBusMetrics {
    pub events_published: AtomicU64,
    pub subscribers_count: AtomicU64,
    pub delivery_errors: AtomicU64,
}

impl<E> EventBus<E>
where
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            metrics: Arc::new(EventBusMetrics::default()),
        }
    }

    /// Publish an event to every subscriber registered for its type.
    ///
    /// Events with no subscriber are counted and dropped.
    #[instrument(skip_all)]
    pub async fn publish(
        &self, event_type: impl Into<String>,
        aggregate_id: impl Into<String>, payload: E,
    ) {
        let event = DomainEvent {
            id: Uuid::now_v7(),
            event_type: event_type.into(),
            aggregate_id: aggregate_id.into(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_micros() as u64,
            payload,
        };

        self.metrics
            .events_published
            .fetch_add(1, Ordering::Relaxed);

        self.route_to_subscribers(event).await;
    }

    /// Subscribe to one event type with a typed handler.
    ///
    /// The handler runs on its own task; whatever it does with a
    /// delivered event stays inside it and cannot propagate back to
    /// publishers.
    pub async fn subscribe<H, F>(&self, event_type: &str, mut handler: H)
    where
        H: FnMut(DomainEvent<E>) -> F + Send + 'static,
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = flume::unbounded();

        {
            let mut subscribers = self.subscribers.write().await;
            subscribers
                .entry(event_type.to_string())
                .or_default()
                .push(tx);
        }

        self.metrics
            .subscribers_count
            .fetch_add(1, Ordering::Relaxed);

        tokio::spawn(async move {
            while let Ok(event) = rx.recv_async().await {
                handler(event).await;
            }
        });
    }

    /// Route event to registered subscribers for the event type
    async fn route_to_subscribers(&self, event: DomainEvent<E>) {
        let subscribers = self.subscribers.read().await;

        if let Some(subs) = subscribers.get(&event.event_type) {
            for tx in subs {
                if tx.send(event.clone()).is_err() {
                    warn!(
                        "Subscriber disconnected for event type: {}",
                        event.event_type
                    );
                    self.metrics
                        .delivery_errors
                        .fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    /// Get current delivery metrics
    pub fn metrics(&self) -> EventBusSnapshot {
        EventBusSnapshot {
            events_published: self
                .metrics
                .events_published
                .load(Ordering::Relaxed),
            subscribers_count: self
                .metrics
                .subscribers_count
                .load(Ordering::Relaxed),
            delivery_errors: self
                .metrics
                .delivery_errors
                .load(Ordering::Relaxed),
        }
    }
}

impl<E> Default for EventBus<E>
where
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self { Self::new() }
}

/// Snapshot of event bus delivery metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBusSnapshot {
    pub events_published: u64,
    pub subscribers_count: u64,
    pub delivery_errors: u64,
}

#[cfg(test)]
mod tests {
    use tokio::time::{Duration, sleep};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestEvent {
        message: String,
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::<TestEvent>::new();
        let events_received = Arc::new(std::sync::Mutex::new(0));
        let events_received_clone = events_received.clone();

        bus.subscribe("test", move |_event: DomainEvent<TestEvent>| {
            let events_received = events_received_clone.clone();
            async move {
                let mut count = events_received.lock().unwrap();
                *count += 1;
            }
        })
        .await;

        for i in 0..5 {
            bus.publish(
                "test",
                format!("aggregate_{}", i),
                TestEvent {
                    message: format!("Test message {}", i),
                },
            )
            .await;
        }

        sleep(Duration::from_millis(100)).await;

        let final_count = *events_received.lock().unwrap();
        assert_eq!(final_count, 5);

        let metrics = bus.metrics();
        assert_eq!(metrics.events_published, 5);
        assert_eq!(metrics.subscribers_count, 1);
    }

    #[tokio::test]
    async fn test_routing_is_per_event_type() {
        let bus = EventBus::<TestEvent>::new();
        let received = Arc::new(std::sync::Mutex::new(Vec::new()));
        let received_clone = received.clone();

        bus.subscribe("court_updated", move |event| {
            let received = received_clone.clone();
            async move {
                received.lock().unwrap().push(event.aggregate_id);
            }
        })
        .await;

        bus.publish(
            "club_updated",
            "22",
            TestEvent {
                message: "ignored".to_string(),
            },
        )
        .await;
        bus.publish(
            "court_updated",
            "23",
            TestEvent {
                message: "delivered".to_string(),
            },
        )
        .await;

        sleep(Duration::from_millis(50)).await;

        let received = received.lock().unwrap();
        assert_eq!(received.as_slice(), ["23"]);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_counted() {
        let bus = EventBus::<TestEvent>::new();

        bus.publish(
            "nobody_home",
            "1",
            TestEvent {
                message: "dropped".to_string(),
            },
        )
        .await;

        let metrics = bus.metrics();
        assert_eq!(metrics.events_published, 1);
        assert_eq!(metrics.delivery_errors, 0);
    }
}
