//! Bot service
//!
//! Process-wide registry of live calls keyed by the platform's call id. It
//! turns inbound signaling into session lookups, creates sessions on first
//! sight of a call id, fires their hooks and builds the response for the
//! platform.

use crate::config::CallingSettings;
use crate::domain::call::{
    CallFactory, CallService, CallStateNotification, CallbackNotification, IncomingCallEvent,
    IncomingCallNotification, MediaCall, WorkflowResponse,
};
use crate::domain::shared::error::{DomainError, Result};
use crate::domain::shared::value_objects::CorrelationId;
use metrics::counter;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub struct BotService {
    settings: CallingSettings,
    call_factory: Arc<dyn CallFactory>,
    calls: Arc<RwLock<HashMap<String, Arc<dyn MediaCall>>>>,
}

impl BotService {
    pub fn new(settings: CallingSettings, call_factory: Arc<dyn CallFactory>) -> Self {
        Self {
            settings,
            call_factory,
            calls: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn settings(&self) -> &CallingSettings {
        &self.settings
    }

    /// Handle an incoming-call notification.
    ///
    /// The first notification for a call id creates and registers a session,
    /// then runs its incoming-call hooks outside the registry lock. Repeat
    /// notifications are accepted without touching the existing session.
    /// Only an unparsable payload is an `Err`; hook failures come back as a
    /// `Failure` response and the session stays registered. A call cleaned up
    /// while its hooks were running also gets `Failure`.
    pub async fn process_incoming_call(
        &self,
        payload: &str,
        correlation_id: Option<&str>,
    ) -> Result<WorkflowResponse> {
        let notification = IncomingCallNotification::parse(payload)?;
        let call_id = notification.id.clone();

        let call = {
            let mut calls = self.calls.write().await;
            match calls.entry(call_id.clone()) {
                Entry::Occupied(existing) => {
                    info!(
                        call_id = %call_id,
                        correlation_id = %existing.get().correlation_id(),
                        "Duplicate incoming call notification, already tracked"
                    );
                    return Ok(WorkflowResponse::accepted_empty());
                }
                Entry::Vacant(slot) => {
                    let correlation_id =
                        CorrelationId::resolve(correlation_id, Some(notification.id.as_str()));
                    let service = Arc::new(CallService::new(call_id.clone(), correlation_id));
                    let call = self.call_factory.create(service);
                    slot.insert(call.clone());
                    call
                }
            }
        };

        info!(
            call_id = %call_id,
            correlation_id = %call.correlation_id(),
            session_call_id = %call.call_id(),
            "Created call session"
        );

        let mut event = IncomingCallEvent::new(Arc::new(notification));
        let fired = call.call_service().fire_incoming_call(&mut event);

        if !self.is_registered(&call_id, &call).await {
            warn!(call_id = %call_id, "Call cleaned up while its incoming call was being handled");
            return Ok(WorkflowResponse::failure(format!(
                "call {} ended before it was answered",
                call_id
            )));
        }

        if let Err(e) = fired {
            warn!(call_id = %call_id, error = %e, "Incoming call handler failed");
            return Ok(WorkflowResponse::failure(
                DomainError::from(e).to_string(),
            ));
        }

        let mut workflow = event.into_workflow();
        if let Err(e) = workflow.validate() {
            warn!(call_id = %call_id, error = %e, "Incoming call handler produced an invalid workflow");
            return Ok(WorkflowResponse::failure(e.to_string()));
        }

        workflow.set_links(self.settings.links());
        debug!(call_id = %call_id, actions = workflow.actions.len(), "Answering incoming call");

        Ok(WorkflowResponse::accepted(workflow))
    }

    /// Route a call-state notification to its session.
    ///
    /// A `terminated` state cleans the call up after the hooks run, even if
    /// they fail.
    pub async fn process_notification(&self, payload: &str) -> Result<()> {
        let notification = CallStateNotification::parse(payload)?;
        let call = self
            .get_call_for_id(&notification.id)
            .await
            .ok_or_else(|| DomainError::NotFound(format!("call {}", notification.id)))?;

        debug!(
            call_id = %notification.id,
            state = notification.current_state.as_str(),
            "Routing call state notification"
        );

        let result = call
            .call_service()
            .fire_call_state_changed(&notification)
            .map_err(DomainError::from);

        if notification.current_state.is_terminal() {
            self.cleanup_call(&notification.id).await;
        }

        result
    }

    /// Route an operation callback to its session and return any follow-up workflow.
    ///
    /// Follow-up workflows carry the same callback links as the first answer.
    pub async fn process_callback(&self, payload: &str) -> Result<WorkflowResponse> {
        let callback = CallbackNotification::parse(payload)?;
        let call = self
            .get_call_for_id(&callback.id)
            .await
            .ok_or_else(|| DomainError::NotFound(format!("call {}", callback.id)))?;

        debug!(
            call_id = %callback.id,
            operation_id = %callback.operation_outcome.id,
            "Routing callback"
        );

        match call.call_service().fire_callback(&callback) {
            Ok(Some(mut workflow)) if !workflow.is_empty() => {
                if let Err(e) = workflow.validate() {
                    warn!(call_id = %callback.id, error = %e, "Callback handler produced an invalid workflow");
                    return Ok(WorkflowResponse::failure(e.to_string()));
                }
                workflow.set_links(self.settings.links());
                Ok(WorkflowResponse::accepted(workflow))
            }
            Ok(_) => Ok(WorkflowResponse::accepted_empty()),
            Err(e) => {
                warn!(call_id = %callback.id, error = %e, "Callback handler failed");
                Ok(WorkflowResponse::failure(DomainError::from(e).to_string()))
            }
        }
    }

    /// Remove a call and fire its cleanup hooks.
    ///
    /// Returns `false` when the call id is not tracked.
    pub async fn cleanup_call(&self, call_id: &str) -> bool {
        let removed = {
            let mut calls = self.calls.write().await;
            calls.remove(call_id)
        };

        let Some(call) = removed else {
            debug!(call_id = %call_id, "Cleanup requested for unknown call");
            return false;
        };

        counter!("calling_cleanups_total").increment(1);
        if let Err(e) = call.call_service().fire_cleanup() {
            warn!(call_id = %call_id, error = %e, "Call cleanup handler failed");
        }

        info!(
            call_id = %call_id,
            correlation_id = %call.correlation_id(),
            "Call cleaned up"
        );
        true
    }

    async fn is_registered(&self, call_id: &str, call: &Arc<dyn MediaCall>) -> bool {
        let calls = self.calls.read().await;
        calls
            .get(call_id)
            .is_some_and(|current| Arc::ptr_eq(current, call))
    }

    pub async fn get_call_for_id(&self, call_id: &str) -> Option<Arc<dyn MediaCall>> {
        let calls = self.calls.read().await;
        calls.get(call_id).cloned()
    }

    /// Snapshot of every live call
    pub async fn calls(&self) -> Vec<Arc<dyn MediaCall>> {
        let calls = self.calls.read().await;
        calls.values().cloned().collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}
