//! Bot façade resolved after registration

use crate::application::bot_service::BotService;
use std::any::Any;
use std::sync::Arc;

/// Top-level object handed out after registration
pub trait MediaBot: Send + Sync + 'static {
    fn bot_service(&self) -> &Arc<BotService>;

    fn as_any(&self) -> &dyn Any;
}

/// Builds the bot façade around the bot service
pub trait BotFactory: Send + Sync {
    fn create(&self, service: Arc<BotService>) -> Arc<dyn MediaBot>;
}

impl<F> BotFactory for F
where
    F: Fn(Arc<BotService>) -> Arc<dyn MediaBot> + Send + Sync,
{
    fn create(&self, service: Arc<BotService>) -> Arc<dyn MediaBot> {
        self(service)
    }
}

/// Stock façade with no behaviour of its own
pub struct CallingBot {
    service: Arc<BotService>,
}

impl CallingBot {
    pub fn new(service: Arc<BotService>) -> Self {
        Self { service }
    }

    pub fn factory() -> impl BotFactory {
        |service: Arc<BotService>| -> Arc<dyn MediaBot> { Arc::new(CallingBot::new(service)) }
    }
}

impl MediaBot for CallingBot {
    fn bot_service(&self) -> &Arc<BotService> {
        &self.service
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
