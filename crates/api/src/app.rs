use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_organizer, security_headers_middleware, trace_id,
};
use crate::routes::{checkin, events, guests, health, qr_codes};
use shared::jwt::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt_keys: Arc<JwtKeys>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let jwt_keys = JwtKeys::new(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.leeway_secs,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize JWT keys: {}", e))?;

    let config = Arc::new(config);
    let state = AppState {
        pool,
        config: config.clone(),
        jwt_keys: Arc::new(jwt_keys),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require organizer bearer token)
    let protected_routes = Router::new()
        // Admission validation and commit
        .route("/api/v1/checkin/validate_qr", post(checkin::validate_qr))
        .route("/api/v1/checkin/checkin", post(checkin::checkin))
        .route("/api/v1/checkin/manual", post(checkin::manual_checkin))
        .route("/api/v1/checkin", get(checkin::list_checkins))
        // Token issuance
        .route("/api/v1/qr-codes/generate", post(qr_codes::generate))
        // Event and guest management
        .route(
            "/api/v1/events",
            post(events::create_event).get(events::list_events),
        )
        .route("/api/v1/events/:event_id", get(events::get_event))
        .route(
            "/api/v1/events/:event_id/guests",
            post(guests::create_guest).get(guests::list_guests),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_organizer,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
