use std::sync::Arc;

use booking_cache_keys::SlotsKey;
use booking_errors::InvalidationError;
use booking_models::Slot;
use kv_store::{CacheKey, KeyValueStore};
use tracing::{info, instrument};

/// Reacts to a slot being booked or becoming available again.
///
/// Both transitions use identical logic: derive the day key from the
/// slot's datetime and evict it. There is no refetch; the next reader
/// repopulates the entry lazily.
#[derive(Clone)]
pub struct SlotStateChangedHandler {
    store: Arc<dyn KeyValueStore>,
}

impl SlotStateChangedHandler {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self { Self { store } }

    #[instrument(skip(self, slot))]
    pub async fn handle(
        &self, club_id: i64, court_id: i64, slot: &Slot,
    ) -> Result<(), InvalidationError> {
        let date = slot.datetime.date_naive();
        let key = SlotsKey.get_key_with_args((&club_id, &court_id, &date));
        info!("Slot state changed, evicting {key}");

        self.store.delete(&key).await?;
        Ok(())
    }
}
