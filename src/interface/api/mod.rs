//! API interface implementations

pub mod calling_handler;
pub mod dto;
pub mod metrics_handler;
pub mod router;

pub use calling_handler::{AppState, CORRELATION_ID_HEADER};
pub use metrics_handler::init_metrics;
pub use router::build_router;
