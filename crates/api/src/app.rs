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
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{events, fallback, health, registrations, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.security.cors_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let cors = cors_layer(&config);
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    let public_routes = Router::new()
        .route("/", get(fallback::index))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let user_routes = Router::new()
        .route("/api/users", post(users::create_user).get(users::list_users))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let event_routes = Router::new()
        .route(
            "/api/events",
            post(events::create_event).get(events::list_events),
        )
        .route("/api/events/upcoming", get(events::upcoming_events))
        .route("/api/events/register", post(registrations::register))
        .route(
            "/api/events/cancel-registration",
            post(registrations::cancel_registration),
        )
        .route(
            "/api/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/events/:id/stats", get(events::event_stats));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(event_routes)
        .fallback(fallback::not_found)
        // Global middleware (bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
