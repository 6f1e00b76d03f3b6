// File: lavamusic-server/src/catalog/events.rs

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use lavamusic_common::traits::repository_traits::SetupRepository;
use lavamusic_core::events::router::SharedHandler;
use lavamusic_core::events::{BotEvent, ButtonPress, EventHandler, NodeEvent, PlatformEvent};
use lavamusic_core::{BotContext, Error};

/// client/ready
pub struct Ready;

#[async_trait]
impl EventHandler for Ready {
    fn name(&self) -> &str {
        "ready"
    }

    async fn run(&self, event: &BotEvent) -> Result<(), Error> {
        if let BotEvent::Platform(PlatformEvent::Ready(ready)) = event {
            info!(
                "Logged in as {} (ID={}) in {} guild(s)",
                ready.user_name, ready.user_id, ready.guild_count
            );
        }
        Ok(())
    }
}

pub fn ready(_: &BotContext) -> Result<SharedHandler, Error> {
    Ok(Arc::new(Ready))
}

/// client/guildDelete: a guild we left has no use for its setup message.
pub struct GuildDelete {
    ctx: BotContext,
}

#[async_trait]
impl EventHandler for GuildDelete {
    fn name(&self) -> &str {
        "guildDelete"
    }

    async fn run(&self, event: &BotEvent) -> Result<(), Error> {
        if let BotEvent::Platform(PlatformEvent::GuildDelete { guild_id }) = event {
            self.ctx.setups.delete_setup(&guild_id.to_string()).await?;
            info!("Left guild {}; setup record removed", guild_id);
        }
        Ok(())
    }
}

pub fn guild_delete(ctx: &BotContext) -> Result<SharedHandler, Error> {
    Ok(Arc::new(GuildDelete { ctx: ctx.clone() }))
}

/// client/setupButtons
pub struct SetupButtons;

#[async_trait]
impl EventHandler for SetupButtons {
    fn name(&self) -> &str {
        "setupButtons"
    }

    async fn run(&self, event: &BotEvent) -> Result<(), Error> {
        if let BotEvent::Platform(PlatformEvent::SetupButtons(interaction)) = event {
            if let Some(press) = ButtonPress::from_interaction(interaction) {
                debug!(
                    "Setup button '{}' pressed by {:?} in guild {:?}",
                    press.custom_id, press.user_id, press.guild_id
                );
            }
        }
        Ok(())
    }
}

pub fn setup_buttons(_: &BotContext) -> Result<SharedHandler, Error> {
    Ok(Arc::new(SetupButtons))
}

/// player/* handlers that only report node and track state.
pub struct NodeLog {
    name: &'static str,
}

#[async_trait]
impl EventHandler for NodeLog {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, event: &BotEvent) -> Result<(), Error> {
        let BotEvent::Node(event) = event else {
            return Ok(());
        };
        match event {
            NodeEvent::NodeConnect { node, reconnected } => {
                info!("Node '{}' connected (reconnected={})", node, reconnected)
            }
            NodeEvent::NodeDisconnect { node, count } => {
                warn!("Node '{}' disconnected ({} player(s) moved)", node, count)
            }
            NodeEvent::NodeError { node, error } => warn!("Node '{}' error: {}", node, error),
            NodeEvent::TrackStart { guild_id, track } => {
                info!("[{}] now playing '{}' by {}", guild_id, track.title, track.author)
            }
            NodeEvent::QueueEnd { guild_id } => info!("[{}] queue ended", guild_id),
            other => debug!("audio-node event {}", other.kind()),
        }
        Ok(())
    }
}

pub fn node_log(name: &'static str) -> impl Fn(&BotContext) -> Result<SharedHandler, Error> + Send + Sync {
    move |_| Ok(Arc::new(NodeLog { name }) as SharedHandler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavamusic_core::test_utils::test_context;
    use twilight_model::id::Id;

    #[tokio::test]
    async fn guild_delete_drops_setup_record() {
        let ctx = test_context();
        ctx.setups.upsert_setup("5", "6", "7").await.unwrap();

        let handler = guild_delete(&ctx).unwrap();
        handler
            .run(&BotEvent::Platform(PlatformEvent::GuildDelete { guild_id: Id::new(5) }))
            .await
            .unwrap();

        assert!(ctx.setups.get_setup("5").await.unwrap().is_none());
    }
}
