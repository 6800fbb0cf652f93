//! Domain layer - Core calling logic and rules
//!
//! This layer contains:
//! - Value Objects: correlation and session call identifiers
//! - Signaling payloads and the workflow model returned to the platform
//! - Per-call services with their lifecycle hooks

pub mod call;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, HandlerError, Result};
