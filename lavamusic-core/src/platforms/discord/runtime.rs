use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};

use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::client::ClientBuilder;
use twilight_http::Client as HttpClient;

use crate::eventbus::EventBus;
use crate::events::{PlatformEvent, ReadyInfo};
use crate::platforms::{ConnectionStatus, Gateway};
use crate::Error;

/// Map a gateway event onto the platform events the router knows about.
/// Everything else is dropped.
pub fn translate_event(event: &Event) -> Option<PlatformEvent> {
    match event {
        Event::Ready(ready) => Some(PlatformEvent::Ready(ReadyInfo {
            application_id: ready.application.id,
            user_id: ready.user.id,
            user_name: ready.user.name.clone(),
            guild_count: ready.guilds.len(),
        })),
        Event::InteractionCreate(interaction) => {
            Some(PlatformEvent::InteractionCreate(Arc::new(interaction.0.clone())))
        }
        Event::MessageCreate(msg) => Some(PlatformEvent::MessageCreate(Arc::new(msg.0.clone()))),
        Event::GuildCreate(_) => event.guild_id().map(|guild_id| PlatformEvent::GuildCreate { guild_id }),
        Event::GuildDelete(_) => event.guild_id().map(|guild_id| PlatformEvent::GuildDelete { guild_id }),
        Event::VoiceStateUpdate(state) => Some(PlatformEvent::VoiceStateUpdate(Arc::new(state.0.clone()))),
        _ => None,
    }
}

/// Reads one shard until it closes, publishing translated events.
async fn shard_runner(mut shard: Shard, events: EventBus<PlatformEvent>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        match item {
            Ok(event) => {
                if let Event::Ready(ready) = &event {
                    info!(
                        "Shard {shard_id} => READY as {} (ID={}) in {} guild(s)",
                        ready.user.name,
                        ready.user.id,
                        ready.guilds.len()
                    );
                }
                match translate_event(&event) {
                    Some(platform_event) => events.publish(platform_event).await,
                    None => trace!("Shard {shard_id} => unhandled event: {:?}", event.kind()),
                }
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

pub struct DiscordGateway {
    intents: Intents,
    status: ConnectionStatus,
    http: Option<Arc<HttpClient>>,
    shard_tasks: Vec<JoinHandle<()>>,
    shard_senders: Vec<MessageSender>,
}

impl Default for DiscordGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscordGateway {
    pub fn new() -> Self {
        Self {
            intents: Intents::GUILDS
                | Intents::GUILD_MESSAGES
                | Intents::MESSAGE_CONTENT
                | Intents::GUILD_VOICE_STATES,
            status: ConnectionStatus::Disconnected,
            http: None,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
        }
    }

    pub fn http(&self) -> Option<Arc<HttpClient>> {
        self.http.clone()
    }

    pub fn shard_count(&self) -> usize {
        self.shard_tasks.len()
    }
}

#[async_trait]
impl Gateway for DiscordGateway {
    async fn login(&mut self, token: &str, events: EventBus<PlatformEvent>) -> Result<(), Error> {
        if matches!(self.status, ConnectionStatus::Connected) {
            info!("(DiscordGateway) Already connected => skipping");
            return Ok(());
        }
        if token.trim().is_empty() {
            return Err(Error::Platform("Discord token is empty".into()));
        }

        let http_client = Arc::new(
            ClientBuilder::new()
                .token(token.to_string())
                .timeout(Duration::from_secs(30))
                .build(),
        );
        self.http = Some(http_client.clone());

        let config = Config::new(token.to_string(), self.intents);
        let shards = gateway::create_recommended(&http_client, config, |_, b| b.build())
            .await
            .map_err(|e| {
                self.status = ConnectionStatus::Error(e.to_string());
                Error::Platform(format!("create_recommended error: {e}"))
            })?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let bus = events.clone();
            self.shard_tasks.push(tokio::spawn(shard_runner(shard, bus)));
        }

        info!("(DiscordGateway) logged in with {} shard(s)", self.shard_tasks.len());
        self.status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.status = ConnectionStatus::Disconnected;

        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in &mut self.shard_tasks {
            let _ = task.await;
        }

        self.shard_senders.clear();
        self.shard_tasks.clear();
        Ok(())
    }

    fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }
}
