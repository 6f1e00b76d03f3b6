// File: src/plugins/mod.rs
//
// Compiled-in plugins. Each one gets the bot while it is still mutable and
// may add commands or event handlers before the registries are frozen.

use async_trait::async_trait;
use tracing::{error, info};

use crate::context::Bot;
use crate::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    async fn initialize(&self, bot: &mut Bot) -> Result<(), Error>;
}

#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Initialize every plugin in registration order. Returns how many
    /// succeeded; failures are logged and skipped.
    pub async fn load_all(&self, bot: &mut Bot) -> usize {
        let mut loaded = 0;
        for plugin in &self.plugins {
            match plugin.initialize(bot).await {
                Ok(()) => {
                    info!("(PluginManager) loaded plugin '{}'", plugin.name());
                    loaded += 1;
                }
                Err(e) => error!("(PluginManager) plugin '{}' failed to initialize: {:?}", plugin.name(), e),
            }
        }
        info!("(PluginManager) {}/{} plugin(s) loaded", loaded, self.plugins.len());
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_bot;
    use lavamusic_common::models::Command;

    struct AddsCommand;

    #[async_trait]
    impl Plugin for AddsCommand {
        fn name(&self) -> &str {
            "adds-command"
        }

        async fn initialize(&self, bot: &mut Bot) -> Result<(), Error> {
            bot.register_command("plugins", Command::new("hello", "cmd.hello.description"))
        }
    }

    #[tokio::test]
    async fn failing_plugin_does_not_stop_the_rest() {
        let mut failing = MockPlugin::new();
        failing.expect_name().return_const("broken".to_string());
        failing
            .expect_initialize()
            .times(1)
            .returning(|_| Err(Error::Platform("boom".into())));

        let mut manager = PluginManager::new();
        manager.register(Box::new(failing));
        manager.register(Box::new(AddsCommand));

        let mut bot = test_bot();
        assert_eq!(manager.load_all(&mut bot).await, 1);
        assert_eq!(bot.commands.get("hello").unwrap().category, "plugins");
        assert_eq!(manager.names(), vec!["broken", "adds-command"]);
    }
}
