use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use booking_events::BookingEvent;
use booking_http::BookingServices;
use booking_precache::PrecacheService;
use booking_query_handlers::{
    CacheService, CacheSettings, GetAvailabilityHandler,
};
use event_bus::EventBus;
use kv_store::{RedisStore, config::RedisDbConfig, connect_redis_db};
use origin_client::{HttpOriginClient, OriginConfig};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Initializing connection pools...");

    let redis_config = RedisDbConfig {
        host: std::env::var("REDIS_HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string()),
        port: std::env::var("REDIS_PORT")
            .unwrap_or_else(|_| "6379".to_string())
            .parse()
            .unwrap_or(6379),
        db: 0,
    };
    let redis_pool = connect_redis_db(&redis_config).await?;
    let store = Arc::new(RedisStore::new(redis_pool));
    info!("Redis connection pool initialized");

    let origin_config = OriginConfig {
        base_url: std::env::var("ORIGIN_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4000".to_string()),
    };
    let origin = Arc::new(HttpOriginClient::new(&origin_config)?);
    info!("Origin client targeting {}", origin_config.base_url);

    let settings = CacheSettings::from_env();
    let cache = CacheService::new(
        store.clone(),
        origin.clone(),
        settings.clone(),
    );

    let events = EventBus::<BookingEvent>::new();
    booking_event_handlers::register(
        &events,
        store,
        origin.clone(),
        cache.clone(),
        &settings,
    )
    .await;
    info!("Invalidation handlers registered");

    // Readiness blocks on the warm-up: a cold start against a slow origin
    // delays serving rather than serving unwarmed.
    PrecacheService::new(origin, cache.clone()).run().await;

    let services = BookingServices::new(
        GetAvailabilityHandler::new(cache),
        events,
    );

    let api_routes = Router::new()
        .route("/availability", get(booking_http::get_availability))
        .route("/events", post(booking_http::publish_event))
        .with_state(services);

    let app = Router::new()
        .route("/", get(health_check))
        .merge(api_routes);

    let app = app
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Courtside server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        booking_http::get_availability,
        booking_http::publish_event,
    ),
    components(
        schemas(
            booking_responses::ClubWithAvailability,
            booking_responses::CourtWithAvailability,
            booking_events::BookingEvent,
            common_errors::ApiErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Cached availability queries"),
        (name = "events", description = "Upstream change notification intake")
    ),
    info(
        title = "Courtside API",
        description = "Read-through caching layer over the booking origin",
        version = "1.0.0"
    )
)]
struct ApiDoc;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = String)
    ),
    tag = "health"
)]
async fn health_check() -> impl IntoResponse { (StatusCode::OK, "OK") }
