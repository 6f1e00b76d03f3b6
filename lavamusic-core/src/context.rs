// File: lavamusic-core/src/context.rs
//
// The explicit bot context handed to every command/event factory, and the
// mutable `Bot` that plugins extend before the registries are frozen.

use std::sync::Arc;

use lavamusic_common::traits::repository_traits::SetupRepository;

use crate::audio::AudioNodeClient;
use crate::commands::CommandRegistry;
use crate::config::BotConfig;
use crate::eventbus::EventBus;
use crate::events::router::EventRouter;
use crate::events::PlatformEvent;
use crate::i18n::I18n;

#[derive(Clone)]
pub struct BotContext {
    pub config: Arc<BotConfig>,
    pub i18n: Arc<I18n>,
    pub setups: Arc<dyn SetupRepository>,
    pub audio: Arc<AudioNodeClient>,
    pub platform_events: EventBus<PlatformEvent>,
}

impl BotContext {
    pub fn new(
        config: Arc<BotConfig>,
        i18n: Arc<I18n>,
        setups: Arc<dyn SetupRepository>,
        audio: Arc<AudioNodeClient>,
        platform_events: EventBus<PlatformEvent>,
    ) -> Self {
        Self {
            config,
            i18n,
            setups,
            audio,
            platform_events,
        }
    }

    /// Translate `key` in the configured default language.
    pub fn t(&self, key: &str) -> String {
        self.i18n.translate(&self.config.default_language, key)
    }
}

/// The bot while it is still being assembled. Plugins receive `&mut Bot`
/// and may register further commands or event handlers.
pub struct Bot {
    pub ctx: Arc<BotContext>,
    pub commands: CommandRegistry,
    pub events: EventRouter,
}

impl Bot {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self {
            ctx,
            commands: CommandRegistry::new(),
            events: EventRouter::new(),
        }
    }

    /// Register a command the same way the loader would.
    pub fn register_command(
        &mut self,
        category: &str,
        command: lavamusic_common::models::Command,
    ) -> Result<(), crate::Error> {
        let i18n = self.ctx.i18n.clone();
        self.commands.register(category, command, &i18n)
    }
}
