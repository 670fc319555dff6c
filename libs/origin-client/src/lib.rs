use async_trait::async_trait;
use booking_models::{Club, Court, Slot, Zone};
use chrono::NaiveDate;

pub mod config;
mod http;

pub use config::OriginConfig;
pub use http::HttpOriginClient;

/// Upstream booking API failure.
#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    #[error("Origin request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Origin URL invalid: {0}")]
    Url(#[from] url::ParseError),

    #[error("Origin error: {0}")]
    Other(String),
}

pub type OriginResult<T> = Result<T, OriginError>;

/// Typed fetch operations against the upstream booking API.
///
/// Every operation is request/response and returns the complete
/// collection; there is no pagination contract. Retry, backoff and
/// timeout policy belong to the implementation, not to callers.
#[async_trait]
pub trait OriginClient: Send + Sync {
    async fn list_zones(&self) -> OriginResult<Vec<Zone>>;

    async fn list_clubs(&self, place_id: &str) -> OriginResult<Vec<Club>>;

    async fn get_club(&self, club_id: i64) -> OriginResult<Club>;

    async fn list_courts(&self, club_id: i64) -> OriginResult<Vec<Court>>;

    async fn list_slots(
        &self, club_id: i64, court_id: i64, date: NaiveDate,
    ) -> OriginResult<Vec<Slot>>;
}
