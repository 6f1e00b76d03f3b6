// File: lavamusic-core/src/test_utils/mod.rs
//
// Fixtures shared by unit tests and the integration tests in `tests/`.

use std::sync::Arc;

use serde_json::{json, Value};
use twilight_model::application::interaction::Interaction;

use lavamusic_common::models::NodeDescriptor;

use crate::audio::AudioNodeClient;
use crate::config::BotConfig;
use crate::context::{Bot, BotContext};
use crate::eventbus::EventBus;
use crate::i18n::I18n;
use crate::repositories::InMemorySetupRepository;

pub fn test_node() -> NodeDescriptor {
    NodeDescriptor {
        name: "local".into(),
        url: "localhost:2333".into(),
        auth: "youshallnotpass".into(),
        secure: false,
    }
}

/// Production config with one static node.
pub fn test_config() -> BotConfig {
    BotConfig {
        token: "test-token".into(),
        nodes: vec![test_node()],
        ..Default::default()
    }
}

pub fn test_i18n() -> I18n {
    let mut i18n = I18n::new("en-US");
    i18n.add_locale("en-US", &json!({ "cmd": {
        "ping": { "description": "Shows the bot's latency" },
        "hello": { "description": "Says hello" }
    } }));
    i18n.add_locale("fr", &json!({ "cmd": {
        "ping": { "description": "Affiche la latence du bot" }
    } }));
    i18n
}

pub fn test_context() -> Arc<BotContext> {
    Arc::new(BotContext::new(
        Arc::new(test_config()),
        Arc::new(test_i18n()),
        Arc::new(InMemorySetupRepository::new()),
        Arc::new(AudioNodeClient::new(vec![test_node()])),
        EventBus::new(),
    ))
}

pub fn test_bot() -> Bot {
    Bot::new(test_context())
}

/// Discord's component type for buttons.
pub const BUTTON: u8 = 2;
/// Discord's component type for string select menus.
pub const STRING_SELECT: u8 = 3;

fn interaction(payload: Value) -> Arc<Interaction> {
    Arc::new(serde_json::from_value(payload).expect("valid interaction payload"))
}

/// A component interaction on message `message_id` in `channel_id`.
pub fn component_interaction(
    guild_id: u64,
    channel_id: u64,
    message_id: u64,
    component_type: u8,
    custom_id: &str,
) -> Arc<Interaction> {
    interaction(json!({
        "id": "1",
        "application_id": "2",
        "type": 3,
        "token": "interaction-token",
        "authorizing_integration_owners": {},
        "guild_id": guild_id.to_string(),
        "guild_locale": "en-US",
        "locale": "fr",
        "channel": { "id": channel_id.to_string(), "type": 0 },
        "data": { "custom_id": custom_id, "component_type": component_type },
        "message": {
            "id": message_id.to_string(),
            "channel_id": channel_id.to_string(),
            "type": 0,
            "author": { "id": "3", "username": "lavamusic", "discriminator": "0001" },
            "content": "",
            "attachments": [],
            "embeds": [],
            "mention_everyone": false,
            "mention_roles": [],
            "mentions": [],
            "pinned": false,
            "tts": false,
            "edited_timestamp": null,
            "timestamp": "2024-10-19T00:00:00.000000+00:00"
        }
    }))
}

/// A gateway PING interaction: no data, no channel.
pub fn ping_interaction() -> Arc<Interaction> {
    interaction(json!({
        "id": "4",
        "application_id": "2",
        "type": 1,
        "token": "ping-token",
        "authorizing_integration_owners": {}
    }))
}
