//! RtCalling - real-time media call session service
//!
//! Tracks the calls a signaling platform hands to this service: parses
//! incoming-call notifications, creates one session per call id, runs the
//! session hooks that build the answer workflow, and routes later
//! notifications and callbacks to the right session until cleanup.

pub mod application;
pub mod config;
pub mod domain;
pub mod interface;

// Re-export commonly used types
pub use domain::shared::error::{DomainError, Result};
