use booking_errors::BookingError;
use booking_models::Club;
use booking_responses::{ClubWithAvailability, CourtWithAvailability};
use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::instrument;

use crate::cache_service::CacheService;

#[derive(Debug, Deserialize)]
pub struct GetAvailabilityQuery {
    pub place_id: String,
    pub date: NaiveDate,
}

/// Composes clubs, courts and per-day slots into the nested availability
/// view. Pure consumer of the cache service: ordering mirrors the origin
/// end to end, and any underlying failure propagates unmodified instead
/// of producing a partial result.
#[derive(Clone)]
pub struct GetAvailabilityHandler {
    cache: CacheService,
}

impl GetAvailabilityHandler {
    pub fn new(cache: CacheService) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetAvailabilityQuery,
    ) -> Result<Vec<ClubWithAvailability>, BookingError> {
        let clubs = self.cache.get_clubs(&query.place_id).await?;

        try_join_all(
            clubs
                .into_iter()
                .map(|club| self.club_availability(club, query.date)),
        )
        .await
    }

    async fn club_availability(
        &self, club: Club, date: NaiveDate,
    ) -> Result<ClubWithAvailability, BookingError> {
        let club_id = club.id;
        let courts = self.cache.get_courts(club_id).await?;

        let courts = try_join_all(courts.into_iter().map(|court| {
            async move {
                let available = self
                    .cache
                    .get_available_slots(club_id, court.id, date)
                    .await?;
                Ok::<_, BookingError>(CourtWithAvailability {
                    court,
                    available,
                })
            }
        }))
        .await?;

        Ok(ClubWithAvailability { club, courts })
    }
}
