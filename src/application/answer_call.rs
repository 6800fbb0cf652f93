//! Stock call session that answers with application-hosted media

use crate::domain::call::{
    Action, CallFactory, CallService, CallSession, CallState, MediaCall, NotificationType,
};
use crate::domain::shared::value_objects::SessionCallId;
use serde_json::Value;
use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Answers every incoming call, hosting the media in this service, and
/// follows the call state the platform reports.
pub struct AnswerCall {
    session: CallSession,
    state: Arc<Mutex<CallState>>,
}

impl AnswerCall {
    pub fn new(service: Arc<CallService>, media_configuration: Value) -> Self {
        let session = CallSession::new(service.clone());
        let state = Arc::new(Mutex::new(CallState::Incoming));

        let call_id = session.call_id().clone();
        service.on_incoming_call(move |event| {
            let workflow = event.workflow_mut();
            workflow.set_actions(vec![Action::answer_app_hosted_media(
                media_configuration.clone(),
            )]);
            workflow.subscribe(NotificationType::CallStateChange);

            info!(
                session_call_id = %call_id,
                participants = event.notification().participants.len(),
                "Answering call with app-hosted media"
            );
            Ok(())
        });

        let tracked = state.clone();
        service.on_call_state_changed(move |notification| {
            *tracked.lock().unwrap_or_else(PoisonError::into_inner) = notification.current_state;
            Ok(())
        });

        let call_id = session.call_id().clone();
        service.on_cleanup(move || {
            info!(session_call_id = %call_id, "Call session released");
            Ok(())
        });

        Self { session, state }
    }

    pub fn factory(media_configuration: Value) -> impl CallFactory {
        move |service: Arc<CallService>| -> Arc<dyn MediaCall> {
            Arc::new(AnswerCall::new(service, media_configuration.clone()))
        }
    }

    pub fn current_state(&self) -> CallState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaCall for AnswerCall {
    fn call_service(&self) -> &Arc<CallService> {
        self.session.service()
    }

    fn call_id(&self) -> &SessionCallId {
        self.session.call_id()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
