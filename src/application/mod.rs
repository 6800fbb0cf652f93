//! Application layer - Use cases and application services
//!
//! This layer orchestrates the call domain to serve the signaling platform:
//! - The bot service: registry of live calls and inbound signaling processing
//! - The bot façade and bootstrap registration
//! - A stock session that answers calls with app-hosted media

pub mod answer_call;
pub mod bot;
pub mod bot_service;
pub mod registration;

pub use answer_call::AnswerCall;
pub use bot::{BotFactory, CallingBot, MediaBot};
pub use bot_service::BotService;
pub use registration::{build_calling_bot, register_calling_bot, resolve_bot};
