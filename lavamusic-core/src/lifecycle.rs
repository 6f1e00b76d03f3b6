//! src/lifecycle.rs
//!
//! Startup sequencing. Each phase is a method that only runs from the state
//! directly before it:
//!
//! ```text
//! Uninitialized -> LocalizationReady -> AudioClientReady -> CommandsLoaded
//!   -> EventsLoaded -> PluginsLoaded -> LoggedIn -> Live
//! ```
//!
//! `start` runs them all in order. A failing phase leaves the state where it
//! was and the error goes back to the caller, which aborts startup.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use lavamusic_common::models::Command;
use lavamusic_common::traits::repository_traits::SetupRepository;

use crate::audio::discovery::fetch_nodes;
use crate::audio::AudioNodeClient;
use crate::commands::CommandRegistry;
use crate::config::BotConfig;
use crate::context::{Bot, BotContext};
use crate::eventbus::EventBus;
use crate::events::router::{EventRouter, SharedHandler};
use crate::events::PlatformEvent;
use crate::http::HttpClient;
use crate::i18n::{self, I18n};
use crate::loader::{HandlerLoader, ModuleTree};
use crate::platforms::{ConnectionStatus, Gateway};
use crate::plugins::PluginManager;
use crate::services::{CommandPublisher, SetupButtonRouter, SlashCommandSynchronizer};
use crate::Error;

pub type CommandTree = ModuleTree<BotContext, Command>;
pub type EventTree = ModuleTree<BotContext, SharedHandler>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Uninitialized,
    LocalizationReady,
    AudioClientReady,
    CommandsLoaded,
    EventsLoaded,
    PluginsLoaded,
    LoggedIn,
    Live,
}

impl LifecycleState {
    pub fn next(self) -> Option<Self> {
        use LifecycleState::*;
        match self {
            Uninitialized => Some(LocalizationReady),
            LocalizationReady => Some(AudioClientReady),
            AudioClientReady => Some(CommandsLoaded),
            CommandsLoaded => Some(EventsLoaded),
            EventsLoaded => Some(PluginsLoaded),
            PluginsLoaded => Some(LoggedIn),
            LoggedIn => Some(Live),
            Live => None,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// External collaborators the orchestrator drives.
pub struct Collaborators {
    pub http: Arc<dyn HttpClient>,
    pub setups: Arc<dyn SetupRepository>,
    pub publisher: Arc<dyn CommandPublisher>,
    pub gateway: Box<dyn Gateway>,
}

pub struct BotLifecycle {
    state: LifecycleState,
    config: Arc<BotConfig>,
    loader: HandlerLoader,
    http: Arc<dyn HttpClient>,
    setups: Arc<dyn SetupRepository>,
    publisher: Arc<dyn CommandPublisher>,
    gateway: Box<dyn Gateway>,
    plugins: PluginManager,
    platform_events: EventBus<PlatformEvent>,

    preset_i18n: Option<I18n>,
    i18n: Option<Arc<I18n>>,
    bot: Option<Bot>,
    ctx: Option<Arc<BotContext>>,
    frozen: Option<(Arc<CommandRegistry>, Arc<EventRouter>)>,
    tasks: Vec<JoinHandle<()>>,
}

impl BotLifecycle {
    pub fn new(config: BotConfig, collaborators: Collaborators) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            config: Arc::new(config),
            loader: HandlerLoader::default(),
            http: collaborators.http,
            setups: collaborators.setups,
            publisher: collaborators.publisher,
            gateway: collaborators.gateway,
            plugins: PluginManager::new(),
            platform_events: EventBus::new(),
            preset_i18n: None,
            i18n: None,
            bot: None,
            ctx: None,
            frozen: None,
            tasks: Vec::new(),
        }
    }

    pub fn with_plugins(mut self, plugins: PluginManager) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_loader(mut self, loader: HandlerLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Use these tables instead of reading `locales_dir`.
    pub fn with_i18n(mut self, i18n: I18n) -> Self {
        self.preset_i18n = Some(i18n);
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn platform_events(&self) -> &EventBus<PlatformEvent> {
        &self.platform_events
    }

    /// The bot being assembled, between `AudioClientReady` and `LoggedIn`.
    pub fn bot(&self) -> Option<&Bot> {
        self.bot.as_ref()
    }

    fn enter(&self, target: LifecycleState) -> Result<(), Error> {
        if self.state.next() != Some(target) {
            return Err(Error::Lifecycle(format!(
                "cannot enter {target} from {}",
                self.state
            )));
        }
        Ok(())
    }

    fn advance(&mut self, target: LifecycleState) {
        debug!("(Lifecycle) {} -> {}", self.state, target);
        self.state = target;
    }

    pub async fn init_localization(&mut self) -> Result<Arc<I18n>, Error> {
        self.enter(LifecycleState::LocalizationReady)?;

        let tables = match self.preset_i18n.take() {
            Some(tables) => tables,
            None => I18n::load_dir(&self.config.locales_dir, self.config.default_language.clone()).await?,
        };
        let i18n = Arc::new(tables);
        if !i18n::init(i18n.clone()) {
            debug!("(Lifecycle) process-wide I18n already installed; keeping it");
        }
        info!("(Lifecycle) localization ready: {:?}", i18n.locales());

        self.i18n = Some(i18n.clone());
        self.advance(LifecycleState::LocalizationReady);
        Ok(i18n)
    }

    pub async fn init_audio(&mut self) -> Result<Arc<AudioNodeClient>, Error> {
        self.enter(LifecycleState::AudioClientReady)?;
        let i18n = self
            .i18n
            .clone()
            .ok_or_else(|| Error::Lifecycle("localization has not been initialized".into()))?;

        let nodes = if self.config.auto_node {
            info!("(Lifecycle) discovering audio nodes from {}", self.config.node_discovery_url);
            fetch_nodes(self.http.as_ref(), &self.config.node_discovery_url).await?
        } else {
            self.config.nodes.clone()
        };
        if nodes.is_empty() {
            return Err(Error::Config("no audio nodes configured".into()));
        }

        let audio = Arc::new(AudioNodeClient::new(nodes));
        let ctx = Arc::new(BotContext::new(
            self.config.clone(),
            i18n,
            self.setups.clone(),
            audio.clone(),
            self.platform_events.clone(),
        ));
        self.bot = Some(Bot::new(ctx));

        info!("(Lifecycle) audio client ready with {} node(s)", audio.nodes().len());
        self.advance(LifecycleState::AudioClientReady);
        Ok(audio)
    }

    pub fn load_commands(&mut self, tree: &CommandTree) -> Result<usize, Error> {
        self.enter(LifecycleState::CommandsLoaded)?;
        let bot = building(&mut self.bot)?;
        let ctx = bot.ctx.clone();
        let count = bot.commands.load(&self.loader, tree, &*ctx, &ctx.i18n)?;
        self.advance(LifecycleState::CommandsLoaded);
        Ok(count)
    }

    pub fn load_events(&mut self, tree: &EventTree) -> Result<usize, Error> {
        self.enter(LifecycleState::EventsLoaded)?;
        let bot = building(&mut self.bot)?;
        let ctx = bot.ctx.clone();
        let count = bot.events.load(&self.loader, tree, &*ctx)?;
        self.advance(LifecycleState::EventsLoaded);
        Ok(count)
    }

    pub async fn load_plugins(&mut self) -> Result<usize, Error> {
        self.enter(LifecycleState::PluginsLoaded)?;
        let bot = building(&mut self.bot)?;
        let loaded = self.plugins.load_all(bot).await;
        self.advance(LifecycleState::PluginsLoaded);
        Ok(loaded)
    }

    /// Freeze the registries and subscribe every listener (router, slash-command
    /// synchronizer, setup buttons) before connecting, so nothing the gateway
    /// publishes during login is missed.
    pub async fn login(&mut self) -> Result<(), Error> {
        self.enter(LifecycleState::LoggedIn)?;
        let bot = self
            .bot
            .take()
            .ok_or_else(|| Error::Lifecycle("bot context has not been built".into()))?;

        let commands = Arc::new(bot.commands);
        let router = Arc::new(bot.events);
        self.tasks.push(router.listen_platform(&self.platform_events).await);
        self.tasks.push(router.listen_node(bot.ctx.audio.events()).await);

        let synchronizer = Arc::new(SlashCommandSynchronizer::new(
            self.publisher.clone(),
            commands.clone(),
            &self.config,
        ));
        self.tasks.push(synchronizer.listen(&self.platform_events).await);

        if self.config.setup_listener {
            let setup_router = SetupButtonRouter::new(self.setups.clone(), self.platform_events.clone());
            self.tasks.push(setup_router.listen(&self.platform_events).await);
        } else {
            warn!("(Lifecycle) setup button listener disabled");
        }

        self.ctx = Some(bot.ctx);
        self.frozen = Some((commands, router));

        self.gateway
            .login(&self.config.token, self.platform_events.clone())
            .await?;

        info!("(Lifecycle) logged in");
        self.advance(LifecycleState::LoggedIn);
        Ok(())
    }

    /// Start steady-state operation and hand the running bot to the caller.
    pub async fn go_live(mut self) -> Result<LiveBot, Error> {
        self.enter(LifecycleState::Live)?;
        let ctx = self
            .ctx
            .take()
            .ok_or_else(|| Error::Lifecycle("bot context has not been built".into()))?;
        let (commands, events) = self
            .frozen
            .take()
            .ok_or_else(|| Error::Lifecycle("registries have not been frozen".into()))?;

        self.advance(LifecycleState::Live);
        info!(
            "(Lifecycle) live with {} command(s) and {} slash command(s)",
            commands.len(),
            commands.manifest().len()
        );
        Ok(LiveBot {
            ctx,
            commands,
            events,
            gateway: self.gateway,
            tasks: self.tasks,
        })
    }

    /// Run every phase in order.
    pub async fn start(mut self, commands: &CommandTree, events: &EventTree) -> Result<LiveBot, Error> {
        self.init_localization().await?;
        self.init_audio().await?;
        self.load_commands(commands)?;
        self.load_events(events)?;
        self.load_plugins().await?;
        self.login().await?;
        self.go_live().await
    }
}

fn building(bot: &mut Option<Bot>) -> Result<&mut Bot, Error> {
    bot.as_mut()
        .ok_or_else(|| Error::Lifecycle("bot context has not been built".into()))
}

/// A bot in the `Live` state.
pub struct LiveBot {
    pub ctx: Arc<BotContext>,
    pub commands: Arc<CommandRegistry>,
    pub events: Arc<EventRouter>,
    gateway: Box<dyn Gateway>,
    tasks: Vec<JoinHandle<()>>,
}

impl LiveBot {
    pub fn state(&self) -> LifecycleState {
        LifecycleState::Live
    }

    pub fn gateway_status(&self) -> ConnectionStatus {
        self.gateway.status()
    }

    pub async fn shutdown(mut self) -> Result<(), Error> {
        info!("(Lifecycle) shutting down");
        self.gateway.disconnect().await?;
        self.ctx.platform_events.shutdown().await;
        self.ctx.audio.events().shutdown().await;
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                warn!("(Lifecycle) background task ended abnormally: {:?}", e);
            }
        }
        Ok(())
    }
}
