//! Interface layer - External interfaces
//!
//! This layer handles:
//! - REST endpoints the signaling platform posts to
//! - Diagnostics and metrics endpoints
//! - Request/response formatting

pub mod api;
