//! API Router configuration

use super::calling_handler::{
    cleanup_call, get_call, health_check, list_calls, on_callback, on_incoming_call,
    on_notification, AppState,
};
use super::metrics_handler::metrics_handler;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Prefix for every route the signaling platform talks to
pub const CALL_SIGNALING_ROUTE_PREFIX: &str = "/api/calling";
pub const ON_INCOMING_CALL_ROUTE: &str = "/call";
pub const ON_CALLBACK_ROUTE: &str = "/callback";
pub const ON_NOTIFICATION_ROUTE: &str = "/notification";
pub const CALLS_ROUTE: &str = "/calls";
pub const CALL_ROUTE: &str = "/calls/:call_id";

/// Build the API router
pub fn build_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Health check route
    let health_routes = Router::new().route("/health", get(health_check));

    // Signaling and diagnostics routes
    let calling_routes = Router::new()
        .route(ON_INCOMING_CALL_ROUTE, post(on_incoming_call))
        .route(ON_CALLBACK_ROUTE, post(on_callback))
        .route(ON_NOTIFICATION_ROUTE, post(on_notification))
        .route(CALLS_ROUTE, get(list_calls))
        .route(CALL_ROUTE, get(get_call).delete(cleanup_call));

    // Metrics route (separate state)
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    // Combine routes with state
    Router::new()
        .merge(health_routes)
        .nest(CALL_SIGNALING_ROUTE_PREFIX, calling_routes)
        .with_state(state)
        .merge(metrics_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
