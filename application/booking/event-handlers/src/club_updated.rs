use std::sync::Arc;
use std::time::Duration;

use booking_cache_keys::{ClubKey, club_slots_pattern};
use booking_errors::InvalidationError;
use booking_query_handlers::CacheSettings;
use futures::future::try_join_all;
use kv_store::{CacheKey, KeyValueStore, KvError};
use origin_client::OriginClient;
use tracing::{info, instrument};

/// Reacts to upstream club changes.
///
/// The club item entry is refreshed eagerly (delete, refetch, re-write
/// with the default TTL). An open-hours change additionally drops every
/// cached slot day of every court of the club: previously computed
/// availability no longer holds once the opening window moved. Any other
/// field change leaves slot entries untouched.
#[derive(Clone)]
pub struct ClubUpdatedHandler {
    store: Arc<dyn KeyValueStore>,
    origin: Arc<dyn OriginClient>,
    default_ttl: Duration,
}

impl ClubUpdatedHandler {
    pub fn new(
        store: Arc<dyn KeyValueStore>, origin: Arc<dyn OriginClient>,
        settings: &CacheSettings,
    ) -> Self {
        Self {
            store,
            origin,
            default_ttl: settings.default_ttl(),
        }
    }

    #[instrument(skip(self))]
    pub async fn handle(
        &self, club_id: i64, fields: &[String],
    ) -> Result<(), InvalidationError> {
        info!("Club {club_id} updated with fields {fields:?}");

        let updated = self.origin.get_club(club_id).await?;

        let key = ClubKey.get_key_with_args((&club_id,));
        self.store.delete(&key).await?;
        let value = serde_json::to_value(&updated).map_err(KvError::from)?;
        self.store
            .set_with_ttl(&key, &value, self.default_ttl)
            .await?;

        if fields.iter().any(|field| field == "openhours") {
            let slot_keys =
                self.store.keys(&club_slots_pattern(club_id)).await?;
            info!(
                "Open hours changed, evicting {} slot entries of club \
                 {club_id}",
                slot_keys.len()
            );
            try_join_all(
                slot_keys
                    .iter()
                    .map(|slot_key| self.store.delete(slot_key)),
            )
            .await?;
        }

        Ok(())
    }
}
