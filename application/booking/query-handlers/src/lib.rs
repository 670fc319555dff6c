mod cache_service;
mod get_availability;
mod settings;

pub use cache_service::CacheService;
pub use get_availability::{GetAvailabilityHandler, GetAvailabilityQuery};
pub use settings::CacheSettings;
