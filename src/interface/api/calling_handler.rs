//! Calling API handlers
//!
//! Endpoints the signaling platform posts to, plus diagnostics over the
//! live call registry.

use super::dto::{ApiResponse, CallListResponse, CallSummary};
use super::metrics_handler::{
    record_incoming_call, record_notification, update_active_sessions,
};
use crate::application::bot::MediaBot;
use crate::domain::call::{ResponseType, WorkflowResponse};
use crate::domain::shared::error::DomainError;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Header carrying the platform's correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<dyn MediaBot>,
}

impl AppState {
    pub fn new(bot: Arc<dyn MediaBot>) -> Self {
        Self { bot }
    }
}

/// Cleanup result
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub call_id: String,
    pub removed: bool,
}

/// Incoming call notification
pub async fn on_incoming_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let correlation_id = headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    info!(correlation_id = ?correlation_id, "API: Incoming call notification");

    let service = state.bot.bot_service();
    match service.process_incoming_call(&body, correlation_id).await {
        Ok(response) => {
            record_incoming_call(match response.response_type {
                ResponseType::Accepted => "accepted",
                ResponseType::Failure => "failure",
            });
            update_active_sessions(service.call_count().await);
            workflow_response(response)
        }
        Err(e) => {
            warn!("API: Rejected incoming call notification: {}", e);
            record_incoming_call("rejected");
            error_response(&e)
        }
    }
}

/// Operation outcome callback for an existing call
pub async fn on_callback(State(state): State<AppState>, body: String) -> Response {
    match state.bot.bot_service().process_callback(&body).await {
        Ok(response) => {
            record_notification("callback");
            workflow_response(response)
        }
        Err(e) => {
            warn!("API: Callback not processed: {}", e);
            error_response(&e)
        }
    }
}

/// Call state notification for an existing call
pub async fn on_notification(State(state): State<AppState>, body: String) -> Response {
    let service = state.bot.bot_service();
    let result = service.process_notification(&body).await;
    update_active_sessions(service.call_count().await);

    match result {
        Ok(()) => {
            record_notification("call_state");
            (
                StatusCode::ACCEPTED,
                Json(ApiResponse::success("notification processed".to_string())),
            )
                .into_response()
        }
        Err(e) => {
            warn!("API: Notification not processed: {}", e);
            error_response(&e)
        }
    }
}

/// List live calls
pub async fn list_calls(State(state): State<AppState>) -> Json<ApiResponse<CallListResponse>> {
    info!("API: Listing live calls");

    let calls: Vec<CallSummary> = state
        .bot
        .bot_service()
        .calls()
        .await
        .iter()
        .map(|call| CallSummary::from(&**call))
        .collect();
    let total = calls.len();

    Json(ApiResponse::success(CallListResponse { calls, total }))
}

/// Get live call by platform call id
pub async fn get_call(State(state): State<AppState>, Path(call_id): Path<String>) -> Response {
    info!("API: Getting call ID: {}", call_id);

    match state.bot.bot_service().get_call_for_id(&call_id).await {
        Some(call) => Json(ApiResponse::success(CallSummary::from(&*call))).into_response(),
        None => error_response(&DomainError::NotFound(format!("call {}", call_id))),
    }
}

/// Explicit end-of-call cleanup
pub async fn cleanup_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Json<ApiResponse<CleanupResponse>> {
    info!("API: Cleaning up call ID: {}", call_id);

    let service = state.bot.bot_service();
    let removed = service.cleanup_call(&call_id).await;
    update_active_sessions(service.call_count().await);

    Json(ApiResponse::success(CleanupResponse { call_id, removed }))
}

/// Health check
pub async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::success("ok".to_string()))
}

fn workflow_response(response: WorkflowResponse) -> Response {
    let status = match response.response_type {
        ResponseType::Accepted => StatusCode::ACCEPTED,
        ResponseType::Failure => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(response)).into_response()
}

fn error_response(err: &DomainError) -> Response {
    let status = match err {
        DomainError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::HandlerFailure(_)
        | DomainError::InvalidWorkflow(_)
        | DomainError::Configuration(_) => {
            error!("API: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiResponse::<()>::error(err.to_string()))).into_response()
}
