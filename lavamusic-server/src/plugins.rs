//! Plugins compiled into the binary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use lavamusic_core::events::{BotEvent, EventHandler, PlatformEvent, PlatformEventKind};
use lavamusic_core::plugins::{Plugin, PluginManager};
use lavamusic_core::{Bot, Error};

pub fn compiled_in() -> PluginManager {
    PluginManager::new().with(GuildCounter::default())
}

/// Keeps a running guild count from READY and guild join/leave events.
#[derive(Default)]
pub struct GuildCounter {
    guilds: Arc<AtomicUsize>,
}

struct CountHandler {
    name: &'static str,
    guilds: Arc<AtomicUsize>,
}

#[async_trait]
impl EventHandler for CountHandler {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, event: &BotEvent) -> Result<(), Error> {
        let BotEvent::Platform(event) = event else {
            return Ok(());
        };
        let count = match event {
            PlatformEvent::Ready(ready) => {
                self.guilds.store(ready.guild_count, Ordering::SeqCst);
                ready.guild_count
            }
            PlatformEvent::GuildCreate { .. } => self.guilds.fetch_add(1, Ordering::SeqCst) + 1,
            PlatformEvent::GuildDelete { .. } => {
                let previous = self
                    .guilds
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
                    .unwrap_or(0);
                previous.saturating_sub(1)
            }
            _ => return Ok(()),
        };
        info!("(GuildCounter) serving {} guild(s)", count);
        Ok(())
    }
}

#[async_trait]
impl Plugin for GuildCounter {
    fn name(&self) -> &str {
        "guild-counter"
    }

    async fn initialize(&self, bot: &mut Bot) -> Result<(), Error> {
        for (name, kind) in [
            ("ready", PlatformEventKind::Ready),
            ("guildCreate", PlatformEventKind::GuildCreate),
            ("guildDelete", PlatformEventKind::GuildDelete),
        ] {
            bot.events.subscribe_platform(
                kind,
                Arc::new(CountHandler {
                    name,
                    guilds: self.guilds.clone(),
                }),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavamusic_core::events::ReadyInfo;
    use lavamusic_core::test_utils::test_bot;
    use twilight_model::id::Id;

    #[tokio::test]
    async fn counts_follow_guild_events() {
        let plugin = GuildCounter::default();
        let mut bot = test_bot();
        plugin.initialize(&mut bot).await.unwrap();

        let ready = BotEvent::Platform(PlatformEvent::Ready(ReadyInfo {
            application_id: Id::new(1),
            user_id: Id::new(2),
            user_name: "lavamusic".into(),
            guild_count: 2,
        }));
        bot.events.dispatch(&ready).await;
        bot.events
            .dispatch(&BotEvent::Platform(PlatformEvent::GuildCreate { guild_id: Id::new(9) }))
            .await;
        assert_eq!(plugin.guilds.load(Ordering::SeqCst), 3);

        for _ in 0..4 {
            bot.events
                .dispatch(&BotEvent::Platform(PlatformEvent::GuildDelete { guild_id: Id::new(9) }))
                .await;
        }
        assert_eq!(plugin.guilds.load(Ordering::SeqCst), 0);
    }
}
