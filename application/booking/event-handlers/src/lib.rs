use std::sync::Arc;

use booking_events::BookingEvent;
use booking_query_handlers::{CacheService, CacheSettings};
use event_bus::{DomainEvent, EventBus};
use kv_store::KeyValueStore;
use origin_client::OriginClient;
use tracing::warn;

mod club_updated;
mod court_updated;
mod slot_state;

pub use club_updated::ClubUpdatedHandler;
pub use court_updated::CourtUpdatedHandler;
pub use slot_state::SlotStateChangedHandler;

/// Wires every invalidation handler onto the bus.
///
/// Handler failures are logged and swallowed right here, so nothing an
/// invalidation does can ever reach the dispatcher or the event source;
/// a failed invalidation degrades to serving stale-until-TTL data.
pub async fn register(
    bus: &EventBus<BookingEvent>, store: Arc<dyn KeyValueStore>,
    origin: Arc<dyn OriginClient>, cache: CacheService,
    settings: &CacheSettings,
) {
    let club_updated =
        ClubUpdatedHandler::new(store.clone(), origin, settings);
    bus.subscribe("club_updated", move |event: DomainEvent<BookingEvent>| {
        let handler = club_updated.clone();
        async move {
            if let BookingEvent::ClubUpdated { club_id, fields } =
                event.payload
            {
                if let Err(e) = handler.handle(club_id, &fields).await {
                    warn!(
                        "Club update invalidation failed for club \
                         {club_id}: {e}"
                    );
                }
            }
        }
    })
    .await;

    let court_updated = CourtUpdatedHandler::new(store.clone(), cache);
    bus.subscribe("court_updated", move |event: DomainEvent<BookingEvent>| {
        let handler = court_updated.clone();
        async move {
            if let BookingEvent::CourtUpdated {
                club_id,
                court_id,
                fields,
            } = event.payload
            {
                if let Err(e) =
                    handler.handle(club_id, court_id, &fields).await
                {
                    warn!(
                        "Court update invalidation failed for club \
                         {club_id}: {e}"
                    );
                }
            }
        }
    })
    .await;

    // Booked and available-again share one handler: either transition
    // only needs eviction.
    let slot_changed = SlotStateChangedHandler::new(store);
    for event_type in ["slot_booked", "slot_available"] {
        let handler = slot_changed.clone();
        bus.subscribe(event_type, move |event: DomainEvent<BookingEvent>| {
            let handler = handler.clone();
            async move {
                match event.payload {
                    BookingEvent::SlotBooked {
                        club_id,
                        court_id,
                        slot,
                    }
                    | BookingEvent::SlotAvailable {
                        club_id,
                        court_id,
                        slot,
                    } => {
                        if let Err(e) =
                            handler.handle(club_id, court_id, &slot).await
                        {
                            warn!(
                                "Slot invalidation failed for club \
                                 {club_id}: {e}"
                            );
                        }
                    }
                    _ => {}
                }
            }
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use test_utils::{MemoryStore, RecordingOrigin, club, court, slot};
    use tokio::time::sleep;

    use super::*;

    // End-to-end through the dispatcher: a published event reaches its
    // handler and mutates the store; a failing handler is contained.
    #[tokio::test]
    async fn published_events_drive_invalidation() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "slots:1:1:2024-12-13",
                &vec![slot("2024-12-13T09:00:00Z")],
                Duration::from_secs(300),
            )
            .await;
        let origin = Arc::new(
            RecordingOrigin::new()
                .with_club(club(1))
                .with_courts(1, vec![court(1)]),
        );
        let settings = CacheSettings::default();
        let cache = CacheService::new(
            store.clone(),
            origin.clone(),
            settings.clone(),
        );
        let bus = EventBus::<BookingEvent>::new();
        register(&bus, store.clone(), origin, cache, &settings).await;

        let event = BookingEvent::SlotBooked {
            club_id: 1,
            court_id: 1,
            slot: slot("2024-12-13T09:00:00Z"),
        };
        bus.publish(event.event_type(), event.aggregate_id(), event).await;

        sleep(Duration::from_millis(100)).await;

        assert!(!store.contains("slots:1:1:2024-12-13").await);
    }

    #[tokio::test]
    async fn handler_failure_never_reaches_the_dispatcher() {
        let store = Arc::new(MemoryStore::new());
        // no club seeded, so the refetch inside the handler fails
        let origin = Arc::new(RecordingOrigin::new());
        let settings = CacheSettings::default();
        let cache = CacheService::new(
            store.clone(),
            origin.clone(),
            settings.clone(),
        );
        let bus = EventBus::<BookingEvent>::new();
        register(&bus, store, origin, cache, &settings).await;

        let event = BookingEvent::ClubUpdated {
            club_id: 99,
            fields: vec!["attributes".to_string()],
        };
        bus.publish(event.event_type(), event.aggregate_id(), event).await;

        sleep(Duration::from_millis(100)).await;

        // delivery succeeded even though the handler errored
        let metrics = bus.metrics();
        assert_eq!(metrics.events_published, 1);
        assert_eq!(metrics.delivery_errors, 0);
    }
}
