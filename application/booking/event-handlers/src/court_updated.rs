use std::sync::Arc;

use booking_cache_keys::CourtsKey;
use booking_errors::InvalidationError;
use booking_query_handlers::CacheService;
use kv_store::{CacheKey, KeyValueStore};
use tracing::{info, instrument};

/// Reacts to upstream court changes.
///
/// Courts are cached as one list per club, so a change to any single
/// court invalidates the whole collection. The list is repopulated
/// through the regular cache-aside read path, which lands it back in the
/// store with its usual TTL in a single origin call.
#[derive(Clone)]
pub struct CourtUpdatedHandler {
    store: Arc<dyn KeyValueStore>,
    cache: CacheService,
}

impl CourtUpdatedHandler {
    pub fn new(store: Arc<dyn KeyValueStore>, cache: CacheService) -> Self {
        Self { store, cache }
    }

    #[instrument(skip(self))]
    pub async fn handle(
        &self, club_id: i64, court_id: i64, fields: &[String],
    ) -> Result<(), InvalidationError> {
        info!(
            "Court {court_id} of club {club_id} updated with fields \
             {fields:?}"
        );

        self.store
            .delete(&CourtsKey.get_key_with_args((&club_id,)))
            .await?;
        self.cache.get_courts(club_id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use booking_models::Court;
    use booking_query_handlers::CacheSettings;
    use test_utils::{MemoryStore, RecordingOrigin, court};

    use super::*;

    fn handler(
        store: Arc<MemoryStore>, origin: Arc<RecordingOrigin>,
    ) -> CourtUpdatedHandler {
        let cache = CacheService::new(
            store.clone(),
            origin,
            CacheSettings::default(),
        );
        CourtUpdatedHandler::new(store, cache)
    }

    #[tokio::test]
    async fn refreshes_the_whole_court_list_in_one_origin_call() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "courts-1",
                &vec![court(1)],
                Duration::from_secs(3600),
            )
            .await;
        let origin = Arc::new(
            RecordingOrigin::new().with_courts(1, vec![court(1), court(2)]),
        );
        let handler = handler(store.clone(), origin.clone());

        // which court changed makes no difference
        handler
            .handle(1, 2, &["name".to_string()])
            .await
            .unwrap();

        assert_eq!(
            store.value_of::<Vec<Court>>("courts-1").await.unwrap(),
            vec![court(1), court(2)]
        );
        assert_eq!(
            store.ttl_of("courts-1").await,
            Some(Duration::from_secs(3600))
        );
        assert_eq!(
            origin.calls.list_courts.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn origin_failure_leaves_the_list_evicted() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "courts-1",
                &vec![court(1)],
                Duration::from_secs(3600),
            )
            .await;
        let origin =
            Arc::new(RecordingOrigin::new().failing_list_courts(1));
        let handler = handler(store.clone(), origin);

        let result = handler.handle(1, 1, &[]).await;

        assert!(result.is_err());
        // stale entry is gone; the next read repopulates lazily
        assert!(!store.contains("courts-1").await);
    }
}
