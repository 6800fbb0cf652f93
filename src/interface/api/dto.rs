//! Calling API DTOs

use crate::domain::call::MediaCall;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live call summary for diagnostics
#[derive(Debug, Serialize, Deserialize)]
pub struct CallSummary {
    pub call_id: String,
    pub correlation_id: String,
    pub session_call_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&dyn MediaCall> for CallSummary {
    fn from(call: &dyn MediaCall) -> Self {
        let service = call.call_service();
        CallSummary {
            call_id: service.call_id().to_string(),
            correlation_id: call.correlation_id().to_string(),
            session_call_id: call.call_id().to_string(),
            created_at: service.created_at(),
        }
    }
}

/// Live calls list response
#[derive(Debug, Serialize, Deserialize)]
pub struct CallListResponse {
    pub calls: Vec<CallSummary>,
    pub total: usize,
}

/// Generic API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}
