// File: lavamusic-core/src/platforms/discord/publisher.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use twilight_http::client::ClientBuilder;
use twilight_http::Client as HttpClient;
use twilight_model::application::command::Command;
use twilight_model::id::marker::ApplicationMarker;
use twilight_model::id::Id;

use crate::services::slash_sync::{CommandPublisher, PublishScope};
use crate::Error;

/// Bulk-overwrites application commands over Discord's REST API.
pub struct TwilightCommandPublisher {
    http: Arc<HttpClient>,
}

impl TwilightCommandPublisher {
    pub fn new(token: &str) -> Self {
        let http = ClientBuilder::new()
            .token(token.to_string())
            .timeout(Duration::from_secs(30))
            .build();
        Self::from_client(Arc::new(http))
    }

    pub fn from_client(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CommandPublisher for TwilightCommandPublisher {
    async fn publish(
        &self,
        application_id: Id<ApplicationMarker>,
        scope: PublishScope,
        commands: &[Command],
    ) -> Result<(), Error> {
        let client = self.http.interaction(application_id);
        match scope {
            PublishScope::Global => {
                client
                    .set_global_commands(commands)
                    .await
                    .map_err(|e| Error::Publish(format!("Failed to register global slash commands: {e}")))?;
            }
            PublishScope::Guild(guild_id) => {
                client
                    .set_guild_commands(guild_id, commands)
                    .await
                    .map_err(|e| Error::Publish(format!("Failed to register slash commands in guild {guild_id}: {e}")))?;
            }
        }
        debug!("(CommandPublisher) {} command(s) sent to {:?}", commands.len(), scope);
        Ok(())
    }
}
