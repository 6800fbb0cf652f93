//! Bootstrap wiring for the bot and its call sessions
//!
//! `build_calling_bot` wires a bot without touching global state.
//! `register_calling_bot` does the same and installs the result as the
//! process-wide bot, which lives until the process exits.

use crate::application::bot::{BotFactory, MediaBot};
use crate::application::bot_service::BotService;
use crate::config::CallingSettings;
use crate::domain::call::CallFactory;
use crate::domain::shared::error::{DomainError, Result};
use std::sync::{Arc, OnceLock};
use tracing::info;

static REGISTERED_BOT: OnceLock<Arc<dyn MediaBot>> = OnceLock::new();

pub fn build_calling_bot<B, C>(
    settings: CallingSettings,
    bot_factory: B,
    call_factory: C,
) -> Result<Arc<dyn MediaBot>>
where
    B: BotFactory,
    C: CallFactory + 'static,
{
    settings.validate()?;

    let service = Arc::new(BotService::new(settings, Arc::new(call_factory)));
    let bot = bot_factory.create(service.clone());

    if !Arc::ptr_eq(bot.bot_service(), &service) {
        return Err(DomainError::Configuration(
            "bot factory must keep the bot service it was given".to_string(),
        ));
    }

    Ok(bot)
}

/// Build the bot and install it as the process-wide instance.
///
/// Fails if a bot is already registered.
pub fn register_calling_bot<B, C>(
    settings: CallingSettings,
    bot_factory: B,
    call_factory: C,
) -> Result<Arc<dyn MediaBot>>
where
    B: BotFactory,
    C: CallFactory + 'static,
{
    let bot = build_calling_bot(settings, bot_factory, call_factory)?;

    REGISTERED_BOT
        .set(bot.clone())
        .map_err(|_| DomainError::Configuration("a calling bot is already registered".to_string()))?;

    info!(
        callback_url = %bot.bot_service().settings().callback_url,
        notification_url = %bot.bot_service().settings().notification_url,
        "Calling bot registered"
    );
    Ok(bot)
}

/// The process-wide bot, if one has been registered
pub fn resolve_bot() -> Option<Arc<dyn MediaBot>> {
    REGISTERED_BOT.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::bot::CallingBot;
    use crate::domain::call::{CallService, CallSession, MediaCall};

    fn call_factory() -> impl CallFactory {
        |service: Arc<CallService>| -> Arc<dyn MediaCall> { Arc::new(CallSession::new(service)) }
    }

    #[test]
    fn test_build_calling_bot() {
        let settings =
            CallingSettings::new("https://someuri/callback", "https://someuri/notification");
        let bot = build_calling_bot(settings.clone(), CallingBot::factory(), call_factory()).unwrap();

        assert!(bot.as_any().downcast_ref::<CallingBot>().is_some());
        assert_eq!(bot.bot_service().settings(), &settings);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = CallingSettings::new("not a url", "https://someuri/notification");
        let result = build_calling_bot(settings, CallingBot::factory(), call_factory());
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_bot_factory_must_keep_service() {
        let settings =
            CallingSettings::new("https://someuri/callback", "https://someuri/notification");
        let detached = |service: Arc<BotService>| -> Arc<dyn MediaBot> {
            let copy = BotService::new(service.settings().clone(), Arc::new(call_factory()));
            Arc::new(CallingBot::new(Arc::new(copy)))
        };

        let result = build_calling_bot(settings, detached, call_factory());
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
