//! Inbound signaling payloads
//!
//! The platform posts three kinds of documents: the incoming-call
//! notification that opens a call, call-state notifications for calls we
//! already track, and callbacks carrying the outcome of a workflow operation.

use crate::domain::shared::error::{DomainError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Call state reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallState {
    Incoming,
    Establishing,
    Established,
    Terminating,
    Terminated,
    #[serde(other)]
    Unknown,
}

impl CallState {
    pub fn as_str(&self) -> &str {
        match self {
            CallState::Incoming => "incoming",
            CallState::Establishing => "establishing",
            CallState::Established => "established",
            CallState::Terminating => "terminating",
            CallState::Terminated => "terminated",
            CallState::Unknown => "unknown",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Terminated)
    }
}

/// Media modality offered with a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalityType {
    Audio,
    Video,
    VideoBasedScreenSharing,
    #[serde(other)]
    Unknown,
}

/// Participant listed in an incoming-call notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationParticipant {
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(default)]
    pub originator: bool,
}

/// Notification that opens a new call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingCallNotification {
    pub id: String,
    #[serde(default)]
    pub participants: Vec<NotificationParticipant>,
    #[serde(default)]
    pub is_multiparty: bool,
    #[serde(default)]
    pub presented_modality_types: Vec<ModalityType>,
    #[serde(default = "default_incoming_state")]
    pub call_state: CallState,
}

fn default_incoming_state() -> CallState {
    CallState::Incoming
}

impl IncomingCallNotification {
    pub fn parse(payload: &str) -> Result<Self> {
        let notification: Self = parse_payload(payload)?;
        require_call_id(&notification.id)?;
        Ok(notification)
    }

    /// The participant who placed the call, if the platform flagged one
    pub fn originator(&self) -> Option<&NotificationParticipant> {
        self.participants.iter().find(|p| p.originator)
    }

    pub fn offers(&self, modality: ModalityType) -> bool {
        self.presented_modality_types.contains(&modality)
    }
}

/// Call-state change pushed for a call we already track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStateNotification {
    pub id: String,
    pub current_state: CallState,
}

impl CallStateNotification {
    pub fn parse(payload: &str) -> Result<Self> {
        let notification: Self = parse_payload(payload)?;
        require_call_id(&notification.id)?;
        Ok(notification)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Success,
    Failure,
}

/// Result of one workflow action, keyed by its operation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub id: String,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Callback for a call we already track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackNotification {
    pub id: String,
    pub operation_outcome: OperationOutcome,
}

impl CallbackNotification {
    pub fn parse(payload: &str) -> Result<Self> {
        let callback: Self = parse_payload(payload)?;
        require_call_id(&callback.id)?;
        Ok(callback)
    }
}

fn parse_payload<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| DomainError::MalformedPayload(e.to_string()))
}

fn require_call_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(DomainError::MalformedPayload(
            "call id must not be empty".to_string(),
        ));
    }
    Ok(())
}
