//! Response handed back to the transport for the signaling platform

use crate::domain::call::workflow::Workflow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseType {
    Accepted,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    pub response_type: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Workflow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowResponse {
    pub fn accepted(workflow: Workflow) -> Self {
        Self {
            response_type: ResponseType::Accepted,
            workflow: Some(workflow),
            error: None,
        }
    }

    /// Re-delivery of a call we already track, or a callback with nothing to add
    pub fn accepted_empty() -> Self {
        Self {
            response_type: ResponseType::Accepted,
            workflow: None,
            error: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Failure,
            workflow: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.response_type == ResponseType::Accepted
    }
}
