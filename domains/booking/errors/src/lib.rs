use common_errors::AppError;
use kv_store::KvError;
use origin_client::OriginError;
use thiserror::Error;

/// Read-path failure.
///
/// Store trouble never reaches callers: reads degrade to origin fetches
/// and write failures are swallowed, so the only thing a read can surface
/// is the origin being unavailable.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Origin request failed: {0}")]
    Origin(#[from] OriginError),
}

/// Invalidation-path failure, consumed by the event dispatcher.
///
/// The dispatcher logs these and returns normally: a failed invalidation
/// degrades to serving stale-until-TTL data, it never crashes event
/// delivery.
#[derive(Debug, Error)]
pub enum InvalidationError {
    #[error("Origin request failed: {0}")]
    Origin(#[from] OriginError),

    #[error("Cache store error: {0}")]
    Store(#[from] KvError),

    #[error(transparent)]
    ReadThrough(#[from] BookingError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Origin(origin_err) => {
                AppError::bad_gateway(
                    "ORIGIN_UNAVAILABLE",
                    &format!("Booking origin unavailable: {origin_err}"),
                )
            }
        }
    }
}
