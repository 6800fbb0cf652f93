//! Shared value objects used across the calling domain

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Separator between the correlation id and the unique suffix of a session call id
pub const CALL_ID_SEPARATOR: char = ':';

/// Correlation identifier
///
/// Set in the media platform to correlate logs for one call across services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Pick the correlation id for an inbound call.
    ///
    /// An explicit override wins unless it is blank or the nil UUID. The
    /// call context id comes next, and a fresh id is generated last.
    pub fn resolve(override_id: Option<&str>, context_id: Option<&str>) -> Self {
        if let Some(id) = override_id.filter(|id| !Self::is_empty_value(id)) {
            return Self::new(id.trim());
        }

        match context_id.filter(|id| !Self::is_empty_value(id)) {
            Some(id) => Self::new(id.trim()),
            None => Self::generate(),
        }
    }

    /// Blank strings and the nil UUID both mean "no correlation id"
    pub fn is_empty_value(value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || Uuid::parse_str(value).map(|id| id.is_nil()).unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Locally generated call identifier
///
/// Always `<correlation id>:<uuid>`, so two sessions sharing a correlation
/// id still get distinct call ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCallId(String);

impl SessionCallId {
    pub fn generate(correlation_id: &CorrelationId) -> Self {
        Self(format!(
            "{}{}{}",
            correlation_id.as_str(),
            CALL_ID_SEPARATOR,
            Uuid::new_v4()
        ))
    }

    /// The correlation id this call id was derived from
    pub fn correlation_prefix(&self) -> &str {
        self.0
            .rsplit_once(CALL_ID_SEPARATOR)
            .map(|(prefix, _)| prefix)
            .unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionCallId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
