use std::sync::Arc;
use std::time::Duration;

use booking_cache_keys::{ClubKey, ClubsInPlaceKey, CourtsKey, SlotsKey};
use booking_errors::BookingError;
use booking_models::{Club, Court, Slot};
use chrono::NaiveDate;
use futures::future::{join_all, try_join_all};
use kv_store::{CacheKey, KeyValueStore};
use origin_client::OriginClient;
use tracing::{debug, instrument, warn};

use crate::settings::CacheSettings;

/// Cache-aside reads for clubs, courts and slot availability.
///
/// All operations are pure reads with a caching side effect; nothing here
/// mutates upstream state. Concurrent misses on the same key are not
/// coalesced: each caller fetches from the origin independently and the
/// last cache write wins.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn KeyValueStore>,
    origin: Arc<dyn OriginClient>,
    settings: CacheSettings,
}

impl CacheService {
    pub fn new(
        store: Arc<dyn KeyValueStore>, origin: Arc<dyn OriginClient>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            store,
            origin,
            settings,
        }
    }

    /// Clubs of a place, through the two-level index + item layout.
    ///
    /// On an index hit every member id resolves through its own
    /// `club-{id}` entry, refetching expired items individually; one
    /// failed item fails the whole call instead of silently omitting the
    /// club. On an index miss the full list is fetched once and both
    /// levels are repopulated. Result ordering mirrors the index (and
    /// thereby the origin), not sub-fetch completion order.
    #[instrument(skip(self))]
    pub async fn get_clubs(
        &self, place_id: &str,
    ) -> Result<Vec<Club>, BookingError> {
        let index_key = ClubsInPlaceKey.get_key_with_args((place_id,));

        if let Some(club_ids) = self.read::<Vec<i64>>(&index_key).await {
            debug!("Cache hit for club index {place_id}");
            return try_join_all(
                club_ids
                    .into_iter()
                    .map(|club_id| self.resolve_club(club_id)),
            )
            .await;
        }

        debug!("Cache miss for club index {place_id}, fetching from origin");
        let clubs = self.origin.list_clubs(place_id).await?;
        let club_ids: Vec<i64> = clubs.iter().map(|club| club.id).collect();

        // Writes are awaited so a warmed index never precedes its items;
        // a failed write degrades to serving uncached.
        let index_write =
            self.write(&index_key, &club_ids, self.settings.default_ttl());
        let item_writes = join_all(clubs.iter().map(|club| {
            async move {
                let key = ClubKey.get_key_with_args((&club.id,));
                self.write(&key, club, self.settings.default_ttl()).await;
            }
        }));
        futures::join!(index_write, item_writes);

        Ok(clubs)
    }

    /// Court list of a club, cached atomically as one entry.
    #[instrument(skip(self))]
    pub async fn get_courts(
        &self, club_id: i64,
    ) -> Result<Vec<Court>, BookingError> {
        let key = CourtsKey.get_key_with_args((&club_id,));

        if let Some(courts) = self.read::<Vec<Court>>(&key).await {
            debug!("Cache hit for courts of club {club_id}");
            return Ok(courts);
        }

        debug!("Cache miss for courts of club {club_id}, fetching from origin");
        let courts = self.origin.list_courts(club_id).await?;
        self.write(&key, &courts, self.settings.default_ttl()).await;
        Ok(courts)
    }

    /// Open slots of one court for one day. Availability is time
    /// sensitive, so these entries get the shorter slots TTL.
    #[instrument(skip(self))]
    pub async fn get_available_slots(
        &self, club_id: i64, court_id: i64, date: NaiveDate,
    ) -> Result<Vec<Slot>, BookingError> {
        let key = SlotsKey.get_key_with_args((&club_id, &court_id, &date));

        if let Some(slots) = self.read::<Vec<Slot>>(&key).await {
            debug!("Cache hit for {key}");
            return Ok(slots);
        }

        debug!("Cache miss for {key}, fetching from origin");
        let slots = self.origin.list_slots(club_id, court_id, date).await?;
        self.write(&key, &slots, self.settings.slots_ttl()).await;
        Ok(slots)
    }

    /// One club through its item entry. Ids referenced by an index whose
    /// item expired are refetched here and re-cached; the index itself is
    /// never rebuilt from this path.
    async fn resolve_club(&self, club_id: i64) -> Result<Club, BookingError> {
        let key = ClubKey.get_key_with_args((&club_id,));

        if let Some(club) = self.read::<Club>(&key).await {
            return Ok(club);
        }

        let club = self.origin.get_club(club_id).await?;
        self.write(&key, &club, self.settings.default_ttl()).await;
        Ok(club)
    }

    /// Store trouble on the read side degrades to a miss; the caller
    /// falls through to the origin.
    async fn read<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.store.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!("Discarding undecodable cache entry {key}: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read for {key} failed, treating as miss: {e}");
                None
            }
        }
    }

    /// Store trouble on the write side is swallowed; the fetched data is
    /// still returned, just not cached.
    async fn write<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        T: serde::Serialize,
    {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping cache write for {key}: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set_with_ttl(key, &value, ttl).await {
            warn!("Cache write for {key} failed, serving uncached: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use test_utils::{MemoryStore, RecordingOrigin, club, court, date, slot};

    use super::*;

    fn service(
        store: Arc<MemoryStore>, origin: Arc<RecordingOrigin>,
    ) -> CacheService {
        CacheService::new(store, origin, CacheSettings::default())
    }

    #[tokio::test]
    async fn get_clubs_miss_populates_index_and_items() {
        let store = Arc::new(MemoryStore::new());
        let origin = Arc::new(
            RecordingOrigin::new()
                .with_clubs("place-1", vec![club(1), club(2)]),
        );
        let cache = service(store.clone(), origin.clone());

        let clubs = cache.get_clubs("place-1").await.unwrap();

        assert_eq!(clubs, vec![club(1), club(2)]);
        assert_eq!(
            store
                .value_of::<Vec<i64>>("clubsInPlace-place-1")
                .await
                .unwrap(),
            vec![1, 2]
        );
        assert_eq!(store.value_of::<Club>("club-1").await.unwrap(), club(1));
        assert_eq!(store.value_of::<Club>("club-2").await.unwrap(), club(2));
        assert_eq!(
            origin.calls.list_clubs.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn get_clubs_index_hit_issues_no_origin_calls() {
        let store = Arc::new(MemoryStore::new());
        let ttl = Duration::from_secs(3600);
        store.seed("clubsInPlace-place-1", &vec![1i64, 2], ttl).await;
        store.seed("club-1", &club(1), ttl).await;
        store.seed("club-2", &club(2), ttl).await;
        let origin = Arc::new(RecordingOrigin::new());
        let cache = service(store, origin.clone());

        let clubs = cache.get_clubs("place-1").await.unwrap();

        assert_eq!(clubs, vec![club(1), club(2)]);
        assert_eq!(origin.calls.total(), 0);
    }

    #[tokio::test]
    async fn get_clubs_refetches_expired_items_individually() {
        let store = Arc::new(MemoryStore::new());
        let ttl = Duration::from_secs(3600);
        store.seed("clubsInPlace-place-1", &vec![1i64, 2], ttl).await;
        store.seed("club-1", &club(1), ttl).await;
        // club-2 expired: index still references it
        let origin = Arc::new(RecordingOrigin::new().with_club(club(2)));
        let cache = service(store.clone(), origin.clone());

        let clubs = cache.get_clubs("place-1").await.unwrap();

        assert_eq!(clubs, vec![club(1), club(2)]);
        assert_eq!(
            origin.calls.get_club.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
        // refetched item is re-cached; the index was not rebuilt
        assert_eq!(store.value_of::<Club>("club-2").await.unwrap(), club(2));
        assert_eq!(
            origin.calls.list_clubs.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn get_clubs_index_hit_failure_propagates() {
        let store = Arc::new(MemoryStore::new());
        let ttl = Duration::from_secs(3600);
        store.seed("clubsInPlace-place-1", &vec![1i64, 2], ttl).await;
        store.seed("club-1", &club(1), ttl).await;
        let origin = Arc::new(RecordingOrigin::new().failing_get_club(2));
        let cache = service(store, origin);

        let result = cache.get_clubs("place-1").await;

        // no partial list: the one failed item fails the whole call
        assert!(matches!(result, Err(BookingError::Origin(_))));
    }

    #[tokio::test]
    async fn get_clubs_preserves_origin_ordering() {
        let store = Arc::new(MemoryStore::new());
        let origin = Arc::new(RecordingOrigin::new().with_clubs(
            "place-1",
            vec![club(7), club(3), club(5)],
        ));
        let cache = service(store.clone(), origin);

        let clubs = cache.get_clubs("place-1").await.unwrap();
        let ids: Vec<i64> = clubs.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 3, 5]);

        // second read comes from the index and keeps the same order
        let clubs = cache.get_clubs("place-1").await.unwrap();
        let ids: Vec<i64> = clubs.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[tokio::test]
    async fn club_entries_use_the_default_ttl() {
        let store = Arc::new(MemoryStore::new());
        let origin = Arc::new(
            RecordingOrigin::new().with_clubs("place-1", vec![club(1)]),
        );
        let cache = service(store.clone(), origin);

        cache.get_clubs("place-1").await.unwrap();

        let ttl = Duration::from_secs(3600);
        assert_eq!(store.ttl_of("clubsInPlace-place-1").await, Some(ttl));
        assert_eq!(store.ttl_of("club-1").await, Some(ttl));
    }

    #[tokio::test]
    async fn get_courts_caches_the_whole_list() {
        let store = Arc::new(MemoryStore::new());
        let origin = Arc::new(
            RecordingOrigin::new().with_courts(1, vec![court(1), court(2)]),
        );
        let cache = service(store.clone(), origin.clone());

        let courts = cache.get_courts(1).await.unwrap();
        assert_eq!(courts, vec![court(1), court(2)]);
        assert_eq!(
            store.ttl_of("courts-1").await,
            Some(Duration::from_secs(3600))
        );

        // hit path: no further origin traffic
        cache.get_courts(1).await.unwrap();
        assert_eq!(
            origin.calls.list_courts.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn get_available_slots_uses_the_slots_ttl() {
        let store = Arc::new(MemoryStore::new());
        let day = date("2024-12-13");
        let origin = Arc::new(RecordingOrigin::new().with_slots(
            1,
            1,
            day,
            vec![slot("2024-12-13T09:00:00Z")],
        ));
        let cache = service(store.clone(), origin);

        let slots = cache.get_available_slots(1, 1, day).await.unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(
            store.ttl_of("slots:1:1:2024-12-13").await,
            Some(Duration::from_secs(300))
        );
    }

    #[tokio::test]
    async fn get_available_slots_hit_issues_no_origin_calls() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "slots:1:1:2024-12-13",
                &vec![slot("2024-12-13T09:00:00Z")],
                Duration::from_secs(300),
            )
            .await;
        let origin = Arc::new(RecordingOrigin::new());
        let cache = service(store, origin.clone());

        let slots = cache
            .get_available_slots(1, 1, date("2024-12-13"))
            .await
            .unwrap();

        assert_eq!(slots, vec![slot("2024-12-13T09:00:00Z")]);
        assert_eq!(origin.calls.total(), 0);
    }

    #[tokio::test]
    async fn store_read_failure_degrades_to_origin_fetch() {
        let store = Arc::new(MemoryStore::new());
        store.fail_reads(true);
        let origin = Arc::new(
            RecordingOrigin::new().with_courts(1, vec![court(1)]),
        );
        let cache = service(store, origin.clone());

        let courts = cache.get_courts(1).await.unwrap();

        assert_eq!(courts, vec![court(1)]);
        assert_eq!(
            origin.calls.list_courts.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn store_write_failure_still_returns_data() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let origin = Arc::new(
            RecordingOrigin::new().with_courts(1, vec![court(1)]),
        );
        let cache = service(store.clone(), origin);

        let courts = cache.get_courts(1).await.unwrap();

        assert_eq!(courts, vec![court(1)]);
        assert!(!store.contains("courts-1").await);
    }

    // There is deliberately no single-flight deduplication: two callers
    // missing the same key both go to the origin and both write the cache
    // (last writer wins). This pins that trade-off down so a change to it
    // shows up as a test failure, not a silent behavior shift.
    #[tokio::test]
    async fn concurrent_misses_each_hit_the_origin() {
        let store = Arc::new(MemoryStore::new());
        let origin = Arc::new(
            RecordingOrigin::new()
                .with_courts(1, vec![court(1)])
                .with_latency(Duration::from_millis(20)),
        );
        let cache = service(store, origin.clone());

        let (a, b) =
            tokio::join!(cache.get_courts(1), cache.get_courts(1));

        assert_eq!(a.unwrap(), vec![court(1)]);
        assert_eq!(b.unwrap(), vec![court(1)]);
        assert_eq!(
            origin.calls.list_courts.load(std::sync::atomic::Ordering::SeqCst),
            2
        );
    }
}
