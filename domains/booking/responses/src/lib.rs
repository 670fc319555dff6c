use booking_models::{Club, Court, Slot};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A court with the open slots for the queried day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourtWithAvailability {
    #[serde(flatten)]
    pub court: Court,
    pub available: Vec<Slot>,
}

/// A club with per-court availability, the unit the availability query
/// returns. Club and court ordering mirrors the origin's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClubWithAvailability {
    #[serde(flatten)]
    pub club: Club,
    pub courts: Vec<CourtWithAvailability>,
}
