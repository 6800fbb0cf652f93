//! Call bounded context - signaling payloads, workflows and per-call sessions

pub mod notification;
pub mod response;
pub mod service;
pub mod session;
pub mod workflow;

pub use notification::{
    CallState, CallStateNotification, CallbackNotification, IncomingCallNotification,
    ModalityType, NotificationParticipant, OperationOutcome, Outcome,
};
pub use response::{ResponseType, WorkflowResponse};
pub use service::{CallService, HookResult, IncomingCallEvent};
pub use session::{CallFactory, CallSession, MediaCall};
pub use workflow::{Action, CallbackLinks, NotificationType, Workflow};
