//! Prometheus metrics handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics exporter
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_gauge!(
        "calling_active_sessions",
        "Number of call sessions currently tracked"
    );
    describe_counter!(
        "calling_incoming_calls_total",
        "Incoming call notifications by outcome"
    );
    describe_counter!(
        "calling_notifications_total",
        "Call-state notifications and callbacks routed to sessions"
    );
    describe_counter!(
        "calling_cleanups_total",
        "Call sessions removed from the registry"
    );

    Ok(handle)
}

/// HTTP metrics handler
pub async fn metrics_handler(State(prometheus_handle): State<PrometheusHandle>) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}

/// Update active sessions gauge
pub fn update_active_sessions(count: usize) {
    gauge!("calling_active_sessions").set(count as f64);
}

/// Record an incoming call notification outcome
pub fn record_incoming_call(outcome: &str) {
    counter!("calling_incoming_calls_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a notification or callback routed to a session
pub fn record_notification(kind: &str) {
    counter!("calling_notifications_total", "kind" => kind.to_string()).increment(1);
}
