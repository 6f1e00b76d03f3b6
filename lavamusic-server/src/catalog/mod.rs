//! Built-in command and event modules, laid out as `<category>/<file>`.

pub mod commands;
pub mod events;

use lavamusic_core::lifecycle::{CommandTree, EventTree};

pub fn commands() -> CommandTree {
    CommandTree::new("commands")
        .with("config", "language.rs", commands::language)
        .with("config", "prefix.rs", commands::prefix)
        .with("config", "setup.rs", commands::setup)
        .with("dev", "eval.rs", commands::eval)
        .with("dev", "reload.rs", commands::reload)
        .with("info", "about.rs", commands::about)
        .with("info", "help.rs", commands::help)
        .with("info", "invite.rs", commands::invite)
        .with("info", "ping.rs", commands::ping)
        .with("music", "loop.rs", commands::repeat)
        .with("music", "nowplaying.rs", commands::nowplaying)
        .with("music", "pause.rs", commands::pause)
        .with("music", "play.rs", commands::play)
        .with("music", "queue.rs", commands::queue)
        .with("music", "resume.rs", commands::resume)
        .with("music", "skip.rs", commands::skip)
        .with("music", "stop.rs", commands::stop)
        .with("music", "volume.rs", commands::volume)
}

pub fn events() -> EventTree {
    EventTree::new("events")
        .with("client", "guildDelete.rs", events::guild_delete)
        .with("client", "ready.rs", events::ready)
        .with("client", "setupButtons.rs", events::setup_buttons)
        .with("player", "nodeConnect.rs", events::node_log("nodeConnect"))
        .with("player", "nodeDisconnect.rs", events::node_log("nodeDisconnect"))
        .with("player", "nodeError.rs", events::node_log("nodeError"))
        .with("player", "queueEnd.rs", events::node_log("queueEnd"))
        .with("player", "trackStart.rs", events::node_log("trackStart"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavamusic_core::commands::CommandRegistry;
    use lavamusic_core::events::router::EventRouter;
    use lavamusic_core::events::{NodeEventKind, PlatformEventKind};
    use lavamusic_core::i18n::I18n;
    use lavamusic_core::loader::HandlerLoader;
    use lavamusic_core::test_utils::test_context;

    async fn shipped_locales() -> I18n {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../locales");
        I18n::load_dir(dir, "en-US").await.unwrap()
    }

    #[tokio::test]
    async fn built_in_commands_load_without_collisions() {
        let ctx = test_context();
        let i18n = shipped_locales().await;
        let mut registry = CommandRegistry::new();
        let loaded = registry
            .load(&HandlerLoader::default(), &commands(), &*ctx, &i18n)
            .unwrap();

        assert_eq!(loaded, 18);
        assert_eq!(registry.categories(), vec!["config", "dev", "info", "music"]);
        assert_eq!(registry.lookup("np").unwrap().name, "nowplaying");
        // dev commands stay off the slash manifest
        assert_eq!(registry.manifest().len(), 16);
        assert!(registry.manifest().iter().all(|c| c.name != "eval"));
    }

    #[tokio::test]
    async fn every_description_key_has_base_text() {
        let ctx = test_context();
        let i18n = shipped_locales().await;
        let mut registry = CommandRegistry::new();
        registry
            .load(&HandlerLoader::default(), &commands(), &*ctx, &i18n)
            .unwrap();

        for entry in registry.manifest() {
            assert!(!entry.description.starts_with("cmd."), "{} is untranslated", entry.name);
            for option in &entry.options {
                assert!(!option.description.starts_with("cmd."), "{}/{} is untranslated", entry.name, option.name);
            }
        }
    }

    #[test]
    fn built_in_events_land_in_their_scopes() {
        let ctx = test_context();
        let mut router = EventRouter::new();
        router.load(&HandlerLoader::default(), &events(), &*ctx).unwrap();

        assert_eq!(router.platform_handlers(PlatformEventKind::Ready).len(), 1);
        assert_eq!(router.platform_handlers(PlatformEventKind::SetupButtons).len(), 1);
        assert_eq!(router.node_handlers(NodeEventKind::TrackStart).len(), 1);
        assert!(router.node_handlers(NodeEventKind::TrackEnd).is_empty());
    }
}
