use booking_models::Slot;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inbound change notifications from the upstream booking system.
///
/// Wire format is a tagged JSON object, e.g.
/// `{"type": "club_updated", "clubId": 22, "fields": ["openhours"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A club's attributes changed; `fields` names what changed.
    #[serde(rename_all = "camelCase")]
    ClubUpdated { club_id: i64, fields: Vec<String> },

    /// A court's attributes changed.
    #[serde(rename_all = "camelCase")]
    CourtUpdated {
        club_id: i64,
        court_id: i64,
        fields: Vec<String>,
    },

    /// A slot was booked.
    #[serde(rename_all = "camelCase")]
    SlotBooked {
        club_id: i64,
        court_id: i64,
        slot: Slot,
    },

    /// A previously booked slot became available again.
    #[serde(rename_all = "camelCase")]
    SlotAvailable {
        club_id: i64,
        court_id: i64,
        slot: Slot,
    },
}

impl BookingEvent {
    /// Routing key used by the event bus subscriber registry.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ClubUpdated { .. } => "club_updated",
            Self::CourtUpdated { .. } => "court_updated",
            Self::SlotBooked { .. } => "slot_booked",
            Self::SlotAvailable { .. } => "slot_available",
        }
    }

    /// The club the event is about, used as the bus aggregate id.
    pub fn aggregate_id(&self) -> String {
        match self {
            Self::ClubUpdated { club_id, .. }
            | Self::CourtUpdated { club_id, .. }
            | Self::SlotBooked { club_id, .. }
            | Self::SlotAvailable { club_id, .. } => club_id.to_string(),
        }
    }
}
