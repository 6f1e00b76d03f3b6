use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::eventbus::EventBus;
use crate::events::{
    BotEvent, EventHandler, EventScope, NodeEvent, NodeEventKind, PlatformEvent, PlatformEventKind,
};
use crate::loader::{HandlerLoader, ModuleTree};
use crate::Error;

pub type SharedHandler = Arc<dyn EventHandler>;

/// Fan-out table from event kind to the ordered list of handlers for it,
/// one table per scope. Populated during startup and read-only afterwards.
#[derive(Default)]
pub struct EventRouter {
    platform: HashMap<PlatformEventKind, Vec<SharedHandler>>,
    node: HashMap<NodeEventKind, Vec<SharedHandler>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every handler in `tree`. Handlers in the `player` category go to
    /// the audio-node table, all others to the platform table.
    pub fn load<C>(
        &mut self,
        loader: &HandlerLoader,
        tree: &ModuleTree<C, SharedHandler>,
        ctx: &C,
    ) -> Result<usize, Error> {
        let modules = loader.load(tree, ctx)?;
        let count = modules.len();
        for module in modules {
            let scope = EventScope::for_category(&module.category);
            self.subscribe(scope, module.handler).map_err(|e| Error::HandlerLoad {
                category: module.category.clone(),
                file: module.file.clone(),
                reason: e.to_string(),
            })?;
        }
        info!("(EventRouter) {} event handler(s) loaded from '{}'", count, tree.root());
        Ok(count)
    }

    /// Subscribe `handler` under its own name in `scope`.
    pub fn subscribe(&mut self, scope: EventScope, handler: SharedHandler) -> Result<(), Error> {
        match scope {
            EventScope::Platform => {
                let kind: PlatformEventKind = handler.name().parse()?;
                self.subscribe_platform(kind, handler);
            }
            EventScope::AudioNode => {
                let kind: NodeEventKind = handler.name().parse()?;
                self.subscribe_node(kind, handler);
            }
        }
        Ok(())
    }

    pub fn subscribe_platform(&mut self, kind: PlatformEventKind, handler: SharedHandler) {
        debug!("(EventRouter) platform '{}' <- {}", kind, handler.name());
        self.platform.entry(kind).or_default().push(handler);
    }

    pub fn subscribe_node(&mut self, kind: NodeEventKind, handler: SharedHandler) {
        debug!("(EventRouter) audio-node '{}' <- {}", kind, handler.name());
        self.node.entry(kind).or_default().push(handler);
    }

    pub fn platform_handlers(&self, kind: PlatformEventKind) -> &[SharedHandler] {
        self.platform.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn node_handlers(&self, kind: NodeEventKind) -> &[SharedHandler] {
        self.node.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Run every handler registered for `event`, in registration order, each
    /// with the same event. A failing handler is logged and the rest still
    /// run. Returns how many handlers were invoked.
    pub async fn dispatch(&self, event: &BotEvent) -> usize {
        let handlers = match event {
            BotEvent::Platform(e) => self.platform_handlers(e.kind()),
            BotEvent::Node(e) => self.node_handlers(e.kind()),
        };

        for handler in handlers {
            if let Err(e) = handler.run(event).await {
                error!(
                    "(EventRouter) {} handler for '{}' failed: {:?}",
                    event.scope(),
                    event.name(),
                    e
                );
            }
        }
        handlers.len()
    }

    /// Subscribe to the platform bus and dispatch everything it carries.
    /// The subscription exists once this returns, so nothing published
    /// afterwards is missed.
    pub async fn listen_platform(self: &Arc<Self>, bus: &EventBus<PlatformEvent>) -> JoinHandle<()> {
        let mut rx = bus.subscribe(None).await;
        let router = self.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                router.dispatch(&BotEvent::Platform(event)).await;
            }
            debug!("(EventRouter) platform bus closed");
        })
    }

    pub async fn listen_node(self: &Arc<Self>, bus: &EventBus<NodeEvent>) -> JoinHandle<()> {
        let mut rx = bus.subscribe(None).await;
        let router = self.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                router.dispatch(&BotEvent::Node(event)).await;
            }
            debug!("(EventRouter) audio-node bus closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lavamusic_common::models::TrackInfo;
    use std::sync::Mutex;
    use twilight_model::id::Id;

    struct Recorder {
        label: &'static str,
        event: &'static str,
        seen: Arc<Mutex<Vec<(String, BotEvent)>>>,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        fn name(&self) -> &str {
            self.event
        }

        async fn run(&self, event: &BotEvent) -> Result<(), Error> {
            self.seen.lock().unwrap().push((self.label.to_string(), event.clone()));
            if self.fail {
                return Err(Error::Platform("boom".into()));
            }
            Ok(())
        }
    }

    fn track() -> TrackInfo {
        TrackInfo {
            encoded: "QAAA".into(),
            title: "Song".into(),
            author: "Artist".into(),
            uri: None,
            length: 1000,
            is_stream: false,
        }
    }

    fn tree(seen: &Arc<Mutex<Vec<(String, BotEvent)>>>, fail_first: bool) -> ModuleTree<(), SharedHandler> {
        let a = seen.clone();
        let b = seen.clone();
        let c = seen.clone();
        ModuleTree::new("events")
            .with("player", "a_start.rs", move |_| {
                Ok(Arc::new(Recorder { label: "first", event: "trackStart", seen: a.clone(), fail: fail_first }) as SharedHandler)
            })
            .with("player", "b_start.rs", move |_| {
                Ok(Arc::new(Recorder { label: "second", event: "trackStart", seen: b.clone(), fail: false }) as SharedHandler)
            })
            .with("client", "ready.rs", move |_| {
                Ok(Arc::new(Recorder { label: "ready", event: "ready", seen: c.clone(), fail: false }) as SharedHandler)
            })
    }

    #[tokio::test]
    async fn track_start_fans_out_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = EventRouter::new();
        router.load(&HandlerLoader::new(".rs"), &tree(&seen, false), &()).unwrap();

        let event = NodeEvent::TrackStart { guild_id: Id::new(1), track: track() };
        let ran = router.dispatch(&BotEvent::Node(event.clone())).await;
        assert_eq!(ran, 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
        for (_, got) in seen.iter() {
            match got {
                BotEvent::Node(e) => assert_eq!(e, &event),
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn player_handlers_do_not_see_platform_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = EventRouter::new();
        router.load(&HandlerLoader::new(".rs"), &tree(&seen, false), &()).unwrap();

        assert_eq!(router.node_handlers(NodeEventKind::TrackStart).len(), 2);
        assert_eq!(router.platform_handlers(PlatformEventKind::Ready).len(), 1);
        assert!(router.platform_handlers(PlatformEventKind::SetupButtons).is_empty());
    }

    #[tokio::test]
    async fn failing_handler_does_not_stop_the_rest() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = EventRouter::new();
        router.load(&HandlerLoader::new(".rs"), &tree(&seen, true), &()).unwrap();

        let event = NodeEvent::TrackStart { guild_id: Id::new(9), track: track() };
        router.dispatch(&BotEvent::Node(event)).await;
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn unknown_event_name_fails_load() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let tree = ModuleTree::new("events").with("player", "bogus.rs", move |_| {
            Ok(Arc::new(Recorder { label: "x", event: "ready", seen: s.clone(), fail: false }) as SharedHandler)
        });
        let err = EventRouter::new().load(&HandlerLoader::new(".rs"), &tree, &()).unwrap_err();
        assert!(matches!(err, Error::HandlerLoad { .. }));
    }

    #[tokio::test]
    async fn bus_listener_dispatches_published_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = EventRouter::new();
        router.load(&HandlerLoader::new(".rs"), &tree(&seen, false), &()).unwrap();
        let router = Arc::new(router);

        let bus = EventBus::new();
        let _task = router.listen_node(&bus).await;
        bus.publish(NodeEvent::TrackStart { guild_id: Id::new(3), track: track() }).await;

        for _ in 0..50 {
            if seen.lock().unwrap().len() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
