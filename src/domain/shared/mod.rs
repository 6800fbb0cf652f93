//! Shared kernel - Common types used across the calling domain

pub mod error;
pub mod value_objects;

pub use error::{DomainError, HandlerError, Result};
pub use value_objects::*;
