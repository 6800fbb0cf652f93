//! Workflow returned to the signaling platform

use crate::domain::shared::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One step the platform should perform on the call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Answer and let this service host the media
    #[serde(rename_all = "camelCase")]
    AnswerAppHostedMedia {
        /// Opaque media negotiation blob handed through to the platform
        media_configuration: Value,
        operation_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Reject { operation_id: String },
    #[serde(rename_all = "camelCase")]
    Hangup { operation_id: String },
}

impl Action {
    pub fn answer_app_hosted_media(media_configuration: Value) -> Self {
        Action::AnswerAppHostedMedia {
            media_configuration,
            operation_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn reject() -> Self {
        Action::Reject {
            operation_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn hangup() -> Self {
        Action::Hangup {
            operation_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn operation_id(&self) -> &str {
        match self {
            Action::AnswerAppHostedMedia { operation_id, .. } => operation_id,
            Action::Reject { operation_id } => operation_id,
            Action::Hangup { operation_id } => operation_id,
        }
    }
}

/// Notification types the platform can push for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    CallStateChange,
    RosterUpdate,
}

/// Where the platform sends follow-up traffic for the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackLinks {
    pub callback: String,
    pub notification: String,
}

/// Ordered actions plus the notifications to subscribe to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub actions: Vec<Action>,
    pub notification_subscriptions: Vec<NotificationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<CallbackLinks>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_actions(&mut self, actions: Vec<Action>) {
        self.actions = actions;
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Subscriptions form a set; insertion order is kept
    pub fn subscribe(&mut self, notification: NotificationType) {
        if !self.notification_subscriptions.contains(&notification) {
            self.notification_subscriptions.push(notification);
        }
    }

    pub fn set_links(&mut self, links: CallbackLinks) {
        self.links = Some(links);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.notification_subscriptions.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(DomainError::InvalidWorkflow(
                "workflow has no actions".to_string(),
            ));
        }

        if let Some(action) = self
            .actions
            .iter()
            .find(|a| a.operation_id().trim().is_empty())
        {
            return Err(DomainError::InvalidWorkflow(format!(
                "action {:?} has no operation id",
                action
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscriptions_are_deduplicated() {
        let mut workflow = Workflow::new();
        workflow.subscribe(NotificationType::CallStateChange);
        workflow.subscribe(NotificationType::RosterUpdate);
        workflow.subscribe(NotificationType::CallStateChange);

        assert_eq!(
            workflow.notification_subscriptions,
            vec![NotificationType::CallStateChange, NotificationType::RosterUpdate]
        );
    }

    #[test]
    fn test_validate() {
        let mut workflow = Workflow::new();
        assert!(workflow.is_empty());
        assert!(matches!(
            workflow.validate(),
            Err(DomainError::InvalidWorkflow(_))
        ));

        workflow.add_action(Action::Hangup {
            operation_id: " ".to_string(),
        });
        assert!(workflow.validate().is_err());

        workflow.set_actions(vec![Action::answer_app_hosted_media(json!({}))]);
        assert!(workflow.validate().is_ok());
        assert!(!workflow.is_empty());
    }

    #[test]
    fn test_reject_action() {
        let mut workflow = Workflow::new();
        workflow.add_action(Action::reject());
        assert!(workflow.validate().is_ok());

        let value = serde_json::to_value(&workflow.actions[0]).unwrap();
        assert_eq!(value["action"], "reject");
        assert_eq!(value["operationId"], workflow.actions[0].operation_id());
    }

    #[test]
    fn test_workflow_wire_shape() {
        let mut workflow = Workflow::new();
        workflow.add_action(Action::AnswerAppHostedMedia {
            media_configuration: json!({ "token": "abc" }),
            operation_id: "op-1".to_string(),
        });
        workflow.subscribe(NotificationType::CallStateChange);

        let value = serde_json::to_value(&workflow).unwrap();
        assert_eq!(
            value,
            json!({
                "actions": [{
                    "action": "answerAppHostedMedia",
                    "mediaConfiguration": { "token": "abc" },
                    "operationId": "op-1"
                }],
                "notificationSubscriptions": ["callStateChange"]
            })
        );
    }
}
