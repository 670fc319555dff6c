use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use booking_events::BookingEvent;
use booking_query_handlers::{GetAvailabilityHandler, GetAvailabilityQuery};
use booking_responses::ClubWithAvailability;
use chrono::NaiveDate;
use common_errors::AppError;
use event_bus::EventBus;
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct BookingServices {
    pub availability: GetAvailabilityHandler,
    pub events: EventBus<BookingEvent>,
}

impl BookingServices {
    pub fn new(
        availability: GetAvailabilityHandler, events: EventBus<BookingEvent>,
    ) -> Self {
        Self {
            availability,
            events,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub place_id: String,
    pub date: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Nested club/court/slot availability", body = Vec<ClubWithAvailability>),
        (status = 400, description = "Invalid query parameters", body = common_errors::ApiErrorResponse),
        (status = 502, description = "Booking origin unavailable", body = common_errors::ApiErrorResponse)
    ),
    tag = "availability"
)]
#[instrument(skip_all)]
pub async fn get_availability(
    State(services): State<BookingServices>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<Vec<ClubWithAvailability>>, AppError> {
    let query = GetAvailabilityQuery {
        place_id: params.place_id,
        date: params.date,
    };
    let availability = services.availability.execute(query).await?;

    Ok(Json(availability))
}

#[utoipa::path(
    post,
    path = "/events",
    request_body = BookingEvent,
    responses(
        (status = 202, description = "Event accepted for asynchronous processing"),
        (status = 400, description = "Unrecognized event payload", body = common_errors::ApiErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip_all)]
pub async fn publish_event(
    State(services): State<BookingServices>,
    Json(event): Json<BookingEvent>,
) -> StatusCode {
    tracing::info!(
        "Received {} event for club {}",
        event.event_type(),
        event.aggregate_id()
    );

    services
        .events
        .publish(event.event_type(), event.aggregate_id(), event)
        .await;

    StatusCode::ACCEPTED
}
