//! Per-call signaling service
//!
//! A `CallService` is created by the registry the first time a call id is
//! seen and handed to the session factory. The session registers its
//! lifecycle hooks on it during construction; the registry fires them.

use crate::domain::call::notification::{
    CallStateNotification, CallbackNotification, IncomingCallNotification,
};
use crate::domain::call::workflow::Workflow;
use crate::domain::shared::error::HandlerError;
use crate::domain::shared::value_objects::CorrelationId;
use chrono::{DateTime, Utc};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

pub type HookResult<T = ()> = std::result::Result<T, HandlerError>;

type IncomingCallHook = Arc<dyn Fn(&mut IncomingCallEvent) -> HookResult + Send + Sync>;
type CallStateHook = Arc<dyn Fn(&CallStateNotification) -> HookResult + Send + Sync>;
type CallbackHook =
    Arc<dyn Fn(&CallbackNotification) -> HookResult<Option<Workflow>> + Send + Sync>;
type CleanupHook = Arc<dyn Fn() -> HookResult + Send + Sync>;

/// Event passed to incoming-call hooks
///
/// Carries the notification that opened the call and the workflow the
/// hooks populate.
#[derive(Debug)]
pub struct IncomingCallEvent {
    notification: Arc<IncomingCallNotification>,
    workflow: Workflow,
}

impl IncomingCallEvent {
    pub fn new(notification: Arc<IncomingCallNotification>) -> Self {
        Self {
            notification,
            workflow: Workflow::new(),
        }
    }

    pub fn notification(&self) -> &IncomingCallNotification {
        &self.notification
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut Workflow {
        &mut self.workflow
    }

    pub fn into_workflow(self) -> Workflow {
        self.workflow
    }
}

/// Where a call is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Answered,
    Released,
}

#[derive(Default)]
struct CallHooks {
    incoming_call: Vec<IncomingCallHook>,
    call_state: Vec<CallStateHook>,
    callback: Vec<CallbackHook>,
    cleanup: Vec<CleanupHook>,
}

pub struct CallService {
    call_id: String,
    correlation_id: CorrelationId,
    created_at: DateTime<Utc>,
    hooks: RwLock<CallHooks>,
    lifecycle: Mutex<Lifecycle>,
}

impl CallService {
    pub fn new(call_id: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self {
            call_id: call_id.into(),
            correlation_id,
            created_at: Utc::now(),
            hooks: RwLock::new(CallHooks::default()),
            lifecycle: Mutex::new(Lifecycle::Created),
        }
    }

    /// External call id assigned by the platform
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn on_incoming_call<F>(&self, hook: F)
    where
        F: Fn(&mut IncomingCallEvent) -> HookResult + Send + Sync + 'static,
    {
        self.hooks_mut(|hooks| hooks.incoming_call.push(Arc::new(hook)));
    }

    pub fn on_call_state_changed<F>(&self, hook: F)
    where
        F: Fn(&CallStateNotification) -> HookResult + Send + Sync + 'static,
    {
        self.hooks_mut(|hooks| hooks.call_state.push(Arc::new(hook)));
    }

    pub fn on_callback<F>(&self, hook: F)
    where
        F: Fn(&CallbackNotification) -> HookResult<Option<Workflow>> + Send + Sync + 'static,
    {
        self.hooks_mut(|hooks| hooks.callback.push(Arc::new(hook)));
    }

    pub fn on_cleanup<F>(&self, hook: F)
    where
        F: Fn() -> HookResult + Send + Sync + 'static,
    {
        self.hooks_mut(|hooks| hooks.cleanup.push(Arc::new(hook)));
    }

    /// Run the incoming-call hooks in registration order.
    ///
    /// Fires at most once per service, and never after cleanup. The
    /// lifecycle lock is held while the hooks run, so a concurrent
    /// `fire_cleanup` waits for them to finish.
    pub fn fire_incoming_call(&self, event: &mut IncomingCallEvent) -> HookResult {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        match *lifecycle {
            Lifecycle::Created => *lifecycle = Lifecycle::Answered,
            Lifecycle::Answered => {
                debug!(call_id = %self.call_id, "Incoming-call hooks already fired");
                return Ok(());
            }
            Lifecycle::Released => {
                debug!(call_id = %self.call_id, "Call released before incoming-call hooks fired");
                return Ok(());
            }
        }

        let hooks = self.hooks_ref(|hooks| hooks.incoming_call.clone());
        for hook in hooks {
            guard(|| hook(event))?;
        }
        Ok(())
    }

    pub fn fire_call_state_changed(&self, notification: &CallStateNotification) -> HookResult {
        let hooks = self.hooks_ref(|hooks| hooks.call_state.clone());
        for hook in hooks {
            guard(|| hook(notification))?;
        }
        Ok(())
    }

    /// Run the callback hooks; the last follow-up workflow returned wins
    pub fn fire_callback(&self, callback: &CallbackNotification) -> HookResult<Option<Workflow>> {
        let hooks = self.hooks_ref(|hooks| hooks.callback.clone());
        let mut follow_up = None;
        for hook in hooks {
            if let Some(workflow) = guard(|| hook(callback))? {
                follow_up = Some(workflow);
            }
        }
        Ok(follow_up)
    }

    /// Run the cleanup hooks once. Every hook runs even if an earlier one fails.
    pub fn fire_cleanup(&self) -> HookResult {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        if *lifecycle == Lifecycle::Released {
            return Ok(());
        }
        *lifecycle = Lifecycle::Released;

        let hooks = self.hooks_ref(|hooks| hooks.cleanup.clone());
        let mut first_error = None;
        for hook in hooks {
            if let Err(e) = guard(|| hook()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// True once cleanup has fired
    pub fn is_released(&self) -> bool {
        *self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner) == Lifecycle::Released
    }

    fn hooks_ref<T>(&self, f: impl FnOnce(&CallHooks) -> T) -> T {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        f(&hooks)
    }

    fn hooks_mut(&self, f: impl FnOnce(&mut CallHooks)) {
        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut hooks)
    }
}

impl std::fmt::Debug for CallService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallService")
            .field("call_id", &self.call_id)
            .field("correlation_id", &self.correlation_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Turn a panicking hook into a handler error so one call cannot take the service down
fn guard<T>(hook: impl FnOnce() -> HookResult<T>) -> HookResult<T> {
    panic::catch_unwind(AssertUnwindSafe(hook)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(HandlerError::new(format!("hook panicked: {}", reason)))
    })
}
