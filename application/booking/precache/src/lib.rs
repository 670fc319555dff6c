use std::sync::Arc;
use std::time::Instant;

use booking_errors::BookingError;
use booking_models::Zone;
use booking_query_handlers::CacheService;
use futures::future::try_join_all;
use origin_client::OriginClient;
use tracing::{error, info, instrument};

/// Startup cache warm-up.
///
/// Walks zone → club → court through the cache service, so every miss on
/// the way down populates the store. Slots are left cold on purpose:
/// per-day availability is too volatile and too combinatorial to preload.
///
/// `run` is awaited before the server starts accepting requests, which
/// means readiness blocks on the warm-up; a cold start against a slow
/// origin delays serving rather than serving unwarmed.
pub struct PrecacheService {
    origin: Arc<dyn OriginClient>,
    cache: CacheService,
}

impl PrecacheService {
    pub fn new(origin: Arc<dyn OriginClient>, cache: CacheService) -> Self {
        Self { origin, cache }
    }

    /// Runs the warm-up once, containing any failure to the log.
    #[instrument(skip_all, name = "precache")]
    pub async fn run(&self) {
        info!("Starting cache warm-up");
        let started = Instant::now();

        match self.warm().await {
            Ok(()) => {
                info!(
                    "Cache warm-up finished in {}ms",
                    started.elapsed().as_millis()
                );
            }
            Err(e) => {
                // The first failure aborts the walk; zones enumerated
                // after it may never have been attempted.
                error!("Cache warm-up aborted: {e}");
            }
        }
    }

    async fn warm(&self) -> Result<(), BookingError> {
        let zones = self.origin.list_zones().await?;
        info!("Warming {} zones", zones.len());

        try_join_all(zones.iter().map(|zone| self.warm_zone(zone))).await?;
        Ok(())
    }

    async fn warm_zone(&self, zone: &Zone) -> Result<(), BookingError> {
        let clubs = self.cache.get_clubs(&zone.place_id).await?;
        try_join_all(
            clubs.iter().map(|club| self.cache.get_courts(club.id)),
        )
        .await?;
        Ok(())
    }
}
