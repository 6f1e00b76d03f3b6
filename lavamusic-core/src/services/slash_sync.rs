// File: lavamusic-core/src/services/slash_sync.rs
//
// Publishes the slash-command manifest once the gateway reports READY.
// Publishing replaces the whole remote set, so re-running it with the same
// manifest leaves the remote state unchanged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use twilight_model::application::command::Command as ManifestEntry;
use twilight_model::id::marker::{ApplicationMarker, GuildMarker};
use twilight_model::id::Id;

use crate::commands::CommandRegistry;
use crate::config::BotConfig;
use crate::eventbus::EventBus;
use crate::events::{PlatformEvent, ReadyInfo};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishScope {
    Global,
    Guild(Id<GuildMarker>),
}

/// Remote command store. `publish` overwrites the set for `scope`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    async fn publish(
        &self,
        application_id: Id<ApplicationMarker>,
        scope: PublishScope,
        commands: &[ManifestEntry],
    ) -> Result<(), Error>;
}

pub struct SlashCommandSynchronizer {
    publisher: Arc<dyn CommandPublisher>,
    commands: Arc<CommandRegistry>,
    production: bool,
    guild_id: Option<Id<GuildMarker>>,
    application_id: Option<Id<ApplicationMarker>>,
    synced: AtomicBool,
}

impl SlashCommandSynchronizer {
    pub fn new(publisher: Arc<dyn CommandPublisher>, commands: Arc<CommandRegistry>, config: &BotConfig) -> Self {
        Self {
            publisher,
            commands,
            production: config.production,
            guild_id: config.guild(),
            application_id: config.application_id(),
            synced: AtomicBool::new(false),
        }
    }

    /// Global in production, the configured guild otherwise.
    pub fn scope(&self) -> Result<PublishScope, Error> {
        if self.production {
            return Ok(PublishScope::Global);
        }
        self.guild_id
            .map(PublishScope::Guild)
            .ok_or_else(|| Error::Config("guild_id is required when production is off".into()))
    }

    /// Publish the manifest unconditionally. Returns the number of entries sent.
    pub async fn sync(&self, ready: &ReadyInfo) -> Result<usize, Error> {
        let scope = self.scope()?;
        let application_id = self.application_id.unwrap_or(ready.application_id);
        let manifest = self.commands.manifest();

        self.publisher.publish(application_id, scope, manifest).await?;
        info!(
            "(SlashSync) published {} slash command(s) to {:?} as {}",
            manifest.len(),
            scope,
            ready.user_name
        );
        Ok(manifest.len())
    }

    /// First READY only. Failures are logged; the bot keeps running.
    pub async fn on_ready(&self, ready: &ReadyInfo) -> bool {
        if self.synced.swap(true, Ordering::SeqCst) {
            debug!("(SlashSync) already synced, ignoring READY");
            return false;
        }
        match self.sync(ready).await {
            Ok(_) => true,
            Err(e) => {
                error!("(SlashSync) failed to publish slash commands: {:?}", e);
                false
            }
        }
    }

    pub fn has_run(&self) -> bool {
        self.synced.load(Ordering::SeqCst)
    }

    /// Wait for the first READY on `bus`, stop listening, then publish.
    /// The subscription is gone before the publish starts, so a slow remote
    /// never applies backpressure to the platform bus.
    pub async fn listen(self: Arc<Self>, bus: &EventBus<PlatformEvent>) -> JoinHandle<()> {
        let mut rx = bus.subscribe(Some(16)).await;
        tokio::spawn(async move {
            let ready = loop {
                match rx.recv().await {
                    Some(PlatformEvent::Ready(ready)) => break ready,
                    Some(_) => continue,
                    None => return,
                }
            };
            drop(rx);
            self.on_ready(&ready).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::I18n;
    use lavamusic_common::models::Command;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Remote store with overwrite semantics.
    #[derive(Default)]
    struct FakeRemote {
        global: Mutex<Option<Vec<ManifestEntry>>>,
        guilds: Mutex<HashMap<Id<GuildMarker>, Vec<ManifestEntry>>>,
    }

    #[async_trait]
    impl CommandPublisher for FakeRemote {
        async fn publish(
            &self,
            _application_id: Id<ApplicationMarker>,
            scope: PublishScope,
            commands: &[ManifestEntry],
        ) -> Result<(), Error> {
            match scope {
                PublishScope::Global => *self.global.lock().unwrap() = Some(commands.to_vec()),
                PublishScope::Guild(id) => {
                    self.guilds.lock().unwrap().insert(id, commands.to_vec());
                }
            }
            Ok(())
        }
    }

    fn registry() -> Arc<CommandRegistry> {
        let mut i18n = I18n::new("en-US");
        i18n.add_locale("en-US", &json!({ "cmd": { "ping": { "description": "Pong" }, "skip": { "description": "Skip" } } }));
        let mut registry = CommandRegistry::new();
        registry.register("info", Command::new("ping", "cmd.ping.description").slash(true), &i18n).unwrap();
        registry.register("music", Command::new("skip", "cmd.skip.description").slash(true), &i18n).unwrap();
        registry.register("dev", Command::new("eval", "cmd.eval.description"), &i18n).unwrap();
        Arc::new(registry)
    }

    fn ready() -> ReadyInfo {
        ReadyInfo {
            application_id: Id::new(7),
            user_id: Id::new(8),
            user_name: "lavamusic".into(),
            guild_count: 1,
        }
    }

    fn config(production: bool, guild_id: Option<u64>) -> BotConfig {
        BotConfig {
            production,
            guild_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn republishing_is_idempotent() {
        let remote = Arc::new(FakeRemote::default());
        let sync = SlashCommandSynchronizer::new(remote.clone(), registry(), &config(true, None));

        assert_eq!(sync.sync(&ready()).await.unwrap(), 2);
        let first = remote.global.lock().unwrap().clone();
        sync.sync(&ready()).await.unwrap();
        let second = remote.global.lock().unwrap().clone();

        assert_eq!(first, second);
        let names: Vec<_> = second.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["ping", "skip"]);
    }

    #[tokio::test]
    async fn body_is_identical_across_scopes() {
        let remote = Arc::new(FakeRemote::default());
        let commands = registry();
        SlashCommandSynchronizer::new(remote.clone(), commands.clone(), &config(true, None))
            .sync(&ready())
            .await
            .unwrap();
        SlashCommandSynchronizer::new(remote.clone(), commands, &config(false, Some(99)))
            .sync(&ready())
            .await
            .unwrap();

        let global = remote.global.lock().unwrap().clone().unwrap();
        let guild = remote.guilds.lock().unwrap().get(&Id::new(99)).cloned().unwrap();
        assert_eq!(global, guild);
    }

    #[tokio::test]
    async fn development_publishes_to_configured_guild() {
        let mut publisher = MockCommandPublisher::new();
        publisher
            .expect_publish()
            .withf(|app, scope, commands| {
                app.get() == 7 && *scope == PublishScope::Guild(Id::new(42)) && commands.len() == 2
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let sync = SlashCommandSynchronizer::new(Arc::new(publisher), registry(), &config(false, Some(42)));
        assert!(sync.on_ready(&ready()).await);
    }

    #[tokio::test]
    async fn development_without_guild_does_not_publish() {
        let mut publisher = MockCommandPublisher::new();
        publisher.expect_publish().times(0);

        let sync = SlashCommandSynchronizer::new(Arc::new(publisher), registry(), &config(false, None));
        assert!(matches!(sync.scope(), Err(Error::Config(_))));
        assert!(!sync.on_ready(&ready()).await);
    }

    #[tokio::test]
    async fn configured_client_id_wins_over_ready() {
        let mut publisher = MockCommandPublisher::new();
        publisher
            .expect_publish()
            .withf(|app, _, _| app.get() == 1234)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let config = BotConfig {
            client_id: Some(1234),
            ..Default::default()
        };
        let sync = SlashCommandSynchronizer::new(Arc::new(publisher), registry(), &config);
        assert!(sync.on_ready(&ready()).await);
    }

    #[tokio::test]
    async fn only_the_first_ready_publishes() {
        let mut publisher = MockCommandPublisher::new();
        publisher.expect_publish().times(1).returning(|_, _, _| Ok(()));

        let sync = SlashCommandSynchronizer::new(Arc::new(publisher), registry(), &config(true, None));
        assert!(sync.on_ready(&ready()).await);
        assert!(!sync.on_ready(&ready()).await);
        assert!(sync.has_run());
    }

    #[tokio::test]
    async fn publish_failure_is_not_propagated() {
        let mut publisher = MockCommandPublisher::new();
        publisher
            .expect_publish()
            .times(1)
            .returning(|_, _, _| Err(Error::Publish("HTTP 401".into())));

        let sync = SlashCommandSynchronizer::new(Arc::new(publisher), registry(), &config(true, None));
        assert!(!sync.on_ready(&ready()).await);
        assert!(sync.has_run());
    }

    #[tokio::test]
    async fn listener_reacts_to_ready_on_the_bus() {
        let remote = Arc::new(FakeRemote::default());
        let sync = Arc::new(SlashCommandSynchronizer::new(remote.clone(), registry(), &config(true, None)));
        let bus = EventBus::new();

        let handle = sync.clone().listen(&bus).await;
        bus.publish(PlatformEvent::GuildDelete { guild_id: Id::new(1) }).await;
        bus.publish(PlatformEvent::Ready(ready())).await;
        handle.await.unwrap();

        assert!(sync.has_run());
        assert_eq!(remote.global.lock().unwrap().as_ref().map(Vec::len), Some(2));
    }

    /// Remote that takes far longer than the gateway takes to send GUILD_CREATEs.
    #[derive(Default)]
    struct SlowRemote {
        started: tokio::sync::Notify,
    }

    #[async_trait]
    impl CommandPublisher for SlowRemote {
        async fn publish(
            &self,
            _application_id: Id<ApplicationMarker>,
            _scope: PublishScope,
            _commands: &[ManifestEntry],
        ) -> Result<(), Error> {
            self.started.notify_one();
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn slow_publish_does_not_stall_the_bus() {
        let remote = Arc::new(SlowRemote::default());
        let sync = Arc::new(SlashCommandSynchronizer::new(remote.clone(), registry(), &config(true, None)));
        let bus = EventBus::new();
        let handle = sync.clone().listen(&bus).await;
        let mut router_rx = bus.subscribe(None).await;

        bus.publish(PlatformEvent::Ready(ready())).await;
        remote.started.notified().await;

        let guilds = async {
            for id in 1..=40 {
                bus.publish(PlatformEvent::GuildCreate { guild_id: Id::new(id) }).await;
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(2), guilds)
            .await
            .expect("platform bus stalled behind the slash-command publish");

        let mut received = 0;
        while let Ok(PlatformEvent::GuildCreate { .. } | PlatformEvent::Ready(_)) = router_rx.try_recv() {
            received += 1;
        }
        assert_eq!(received, 41);
        assert_eq!(bus.subscriber_count().await, 1);

        handle.abort();
    }
}
