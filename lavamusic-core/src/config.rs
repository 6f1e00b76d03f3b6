// File: lavamusic-core/src/config.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use twilight_model::id::marker::{ApplicationMarker, GuildMarker};
use twilight_model::id::Id;

use lavamusic_common::models::NodeDescriptor;

use crate::audio::discovery::DEFAULT_DISCOVERY_URL;
use crate::i18n::BASE_LOCALE;
use crate::Error;

/// Everything the bot core reads from its environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub token: String,
    /// Overrides the application id reported by READY.
    pub client_id: Option<u64>,
    pub prefix: String,
    pub owner_ids: Vec<u64>,
    /// Guild used for command publishing outside production.
    pub guild_id: Option<u64>,
    pub production: bool,
    pub default_language: String,
    pub locales_dir: PathBuf,
    pub database_url: Option<String>,
    pub auto_node: bool,
    pub node_discovery_url: String,
    pub nodes: Vec<NodeDescriptor>,
    pub setup_listener: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            client_id: None,
            prefix: "!".to_string(),
            owner_ids: Vec::new(),
            guild_id: None,
            production: true,
            default_language: BASE_LOCALE.to_string(),
            locales_dir: PathBuf::from("locales"),
            database_url: None,
            auto_node: false,
            node_discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            nodes: Vec::new(),
            setup_listener: true,
        }
    }
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.token.trim().is_empty() {
            return Err(Error::Config("bot token is empty".into()));
        }
        if !self.auto_node && self.nodes.is_empty() {
            return Err(Error::Config("no audio nodes configured and auto_node is off".into()));
        }
        Ok(())
    }

    pub fn application_id(&self) -> Option<Id<ApplicationMarker>> {
        self.client_id.and_then(Id::new_checked)
    }

    pub fn guild(&self) -> Option<Id<GuildMarker>> {
        self.guild_id.and_then(Id::new_checked)
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }
}
