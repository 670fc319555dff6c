use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Geographic partition of the upstream catalogue. Zones only exist to
/// drive the warm-up fan-out; they are never cached themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub place_id: String,
}

/// A club as returned by the upstream API. Snapshots are immutable: the
/// cache only ever replaces whole records, never patches fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_hours: Option<Vec<OpenHours>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenHours {
    pub day_of_week: u8,
    pub open_time: String,
    pub close_time: String,
}

/// A court, scoped to its parent club. Courts are only ever cached as a
/// complete per-club list, never individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports: Option<Vec<String>>,
}

/// One bookable interval of a (club, court, day). Slots carry no identity
/// of their own and are addressed only as members of a per-day list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub price: f64,
    pub duration: i64,
    pub datetime: DateTime<Utc>,
    pub start: String,
    pub end: String,
    pub priority: i64,
}
