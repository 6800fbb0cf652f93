//! Registration and incoming-call integration tests

use rtcalling::application::{register_calling_bot, resolve_bot, BotService, MediaBot};
use rtcalling::config::CallingSettings;
use rtcalling::domain::call::{
    Action, CallService, CallSession, MediaCall, NotificationType, ResponseType,
};
use rtcalling::domain::shared::value_objects::{CorrelationId, SessionCallId};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;

struct TestBot {
    service: Arc<BotService>,
}

impl MediaBot for TestBot {
    fn bot_service(&self) -> &Arc<BotService> {
        &self.service
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct TestCall {
    session: CallSession,
}

impl TestCall {
    fn new(service: Arc<CallService>) -> Self {
        service.on_incoming_call(|event| {
            event
                .workflow_mut()
                .set_actions(vec![Action::answer_app_hosted_media(
                    json!({ "Token": "MediaConfiguration" }),
                )]);
            event.workflow_mut().subscribe(NotificationType::CallStateChange);
            Ok(())
        });
        service.on_cleanup(|| Ok(()));

        Self {
            session: CallSession::new(service),
        }
    }
}

impl MediaCall for TestCall {
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

const REQUEST: &str = r#"{
  "id": "0b022b87-f255-4667-9335-2335f30ee8de",
  "participants": [
    {
      "identity": "29:1kMGSkuCPgD7ReaC5V2XN08CMOjOcs9MngtbzvvJ8sNU",
      "languageId": "en-US",
      "originator": true
    },
    {
      "identity": "28:c89e6f90-2b47-4eee-8e3b-22d0b3a6d495",
      "originator": false
    }
  ],
  "isMultiparty": false,
  "presentedModalityTypes": [
    "audio"
  ],
  "callState": "incoming"
}"#;

const FIRST_ID: &str = "0b022b87-f255-4667-9335-2335f30ee8de";
const SECOND_ID: &str = "0b022b88-f255-4667-9335-2335f30ee8de";

async fn lookup(service: &BotService, call_id: &str) -> Arc<dyn MediaCall> {
    service
        .get_call_for_id(call_id)
        .await
        .unwrap_or_else(|| panic!("call {} should be registered", call_id))
}

fn assert_session_identity(call: &Arc<dyn MediaCall>) {
    let test_call = call.as_any().downcast_ref::<TestCall>().unwrap();
    let correlation: &CorrelationId = test_call.correlation_id();
    assert!(!correlation.as_str().is_empty());
    assert!(!test_call.call_id().as_str().is_empty());
    assert_eq!(correlation, test_call.call_service().correlation_id());
    assert!(test_call.call_id().as_str().starts_with(correlation.as_str()));
}

#[tokio::test]
async fn test_creating_bot_and_processing_incoming_calls() {
    let settings =
        CallingSettings::new("https://someuri/callback", "https://someuri/notification");

    let registered = register_calling_bot(
        settings,
        |service: Arc<BotService>| -> Arc<dyn MediaBot> { Arc::new(TestBot { service }) },
        |service: Arc<CallService>| -> Arc<dyn MediaCall> { Arc::new(TestCall::new(service)) },
    )
    .unwrap();

    let bot = resolve_bot().unwrap();
    assert!(Arc::ptr_eq(&bot, &registered));
    assert!(bot.as_any().downcast_ref::<TestBot>().is_some());
    let service = bot.bot_service();

    // First delivery creates the session
    let result = service.process_incoming_call(REQUEST, None).await.unwrap();
    assert_eq!(result.response_type, ResponseType::Accepted);
    assert_eq!(service.call_count().await, 1);
    assert!(service.get_call_for_id(SECOND_ID).await.is_none());

    let call1 = lookup(service, FIRST_ID).await;
    assert_session_identity(&call1);

    // Re-delivery with an empty correlation id
    let nil = uuid::Uuid::nil().to_string();
    let result = service
        .process_incoming_call(REQUEST, Some(&nil))
        .await
        .unwrap();
    assert_eq!(result.response_type, ResponseType::Accepted);
    assert_eq!(service.call_count().await, 1);
    assert!(service.get_call_for_id(SECOND_ID).await.is_none());

    let call2 = lookup(service, FIRST_ID).await;
    assert_session_identity(&call2);
    assert_eq!(call1.correlation_id(), call2.correlation_id());

    // A different call id gets its own session
    let request = REQUEST.replace("0b022b87", "0b022b88");
    let result = service.process_incoming_call(&request, None).await.unwrap();
    assert_eq!(result.response_type, ResponseType::Accepted);
    assert_eq!(service.call_count().await, 2);

    let call3 = lookup(service, SECOND_ID).await;
    assert_session_identity(&call3);
    assert!(service.get_call_for_id(FIRST_ID).await.is_some());
    assert!(!Arc::ptr_eq(&call1, &call3));
    assert_ne!(call1.call_id(), call3.call_id());

    // Registration happens once per process
    let again = register_calling_bot(
        CallingSettings::new("https://someuri/callback", "https://someuri/notification"),
        |service: Arc<BotService>| -> Arc<dyn MediaBot> { Arc::new(TestBot { service }) },
        |service: Arc<CallService>| -> Arc<dyn MediaCall> { Arc::new(TestCall::new(service)) },
    );
    assert!(again.is_err());
}
