//! Call sessions and the factory seam that builds them

use crate::domain::call::service::CallService;
use crate::domain::shared::value_objects::{CorrelationId, SessionCallId};
use std::any::Any;
use std::sync::Arc;

/// A live call tracked by the bot service
///
/// Implemented by user session types. Implementations usually embed a
/// [`CallSession`] and register their hooks on its [`CallService`] in the
/// constructor.
pub trait MediaCall: Send + Sync + 'static {
    fn call_service(&self) -> &Arc<CallService>;

    /// Locally generated id, unique to this session
    fn call_id(&self) -> &SessionCallId;

    fn correlation_id(&self) -> &CorrelationId {
        self.call_service().correlation_id()
    }

    /// Lets callers get back to the concrete session type
    fn as_any(&self) -> &dyn Any;
}

/// Builds a session for a call id seen for the first time
#[cfg_attr(test, mockall::automock)]
pub trait CallFactory: Send + Sync {
    fn create(&self, service: Arc<CallService>) -> Arc<dyn MediaCall>;
}

impl<F> CallFactory for F
where
    F: Fn(Arc<CallService>) -> Arc<dyn MediaCall> + Send + Sync,
{
    fn create(&self, service: Arc<CallService>) -> Arc<dyn MediaCall> {
        self(service)
    }
}

/// Identity and service handle shared by every session type
#[derive(Debug, Clone)]
pub struct CallSession {
    call_id: SessionCallId,
    service: Arc<CallService>,
}

impl CallSession {
    pub fn new(service: Arc<CallService>) -> Self {
        Self {
            call_id: SessionCallId::generate(service.correlation_id()),
            service,
        }
    }

    pub fn call_id(&self) -> &SessionCallId {
        &self.call_id
    }

    pub fn service(&self) -> &Arc<CallService> {
        &self.service
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        self.service.correlation_id()
    }
}

impl MediaCall for CallSession {
    fn call_service(&self) -> &Arc<CallService> {
        &self.service
    }

    fn call_id(&self) -> &SessionCallId {
        &self.call_id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_sharing_correlation_get_distinct_ids() {
        let correlation = CorrelationId::new("shared");
        let first = CallSession::new(Arc::new(CallService::new("A", correlation.clone())));
        let second = CallSession::new(Arc::new(CallService::new("B", correlation.clone())));

        assert_ne!(first.call_id(), second.call_id());
        for session in [&first, &second] {
            assert!(session.call_id().as_str().starts_with("shared:"));
            assert_eq!(session.correlation_id(), &correlation);
        }
    }

    #[test]
    fn test_closure_factory() {
        let factory = |service: Arc<CallService>| -> Arc<dyn MediaCall> {
            Arc::new(CallSession::new(service))
        };

        let call = factory.create(Arc::new(CallService::new("A", CorrelationId::new("c"))));
        assert_eq!(call.call_service().call_id(), "A");
        assert!(call.as_any().downcast_ref::<CallSession>().is_some());
    }
}
