// lavamusic-core/src/repositories/memory.rs
//
// Process-local setup storage, used when no database is configured.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use lavamusic_common::error::Error;
use lavamusic_common::models::SetupRecord;
use lavamusic_common::traits::repository_traits::SetupRepository;

#[derive(Clone, Default)]
pub struct InMemorySetupRepository {
    setups: Arc<RwLock<HashMap<String, SetupRecord>>>,
}

impl InMemorySetupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SetupRepository for InMemorySetupRepository {
    async fn get_setup(&self, guild_id: &str) -> Result<Option<SetupRecord>, Error> {
        Ok(self.setups.read().await.get(guild_id).cloned())
    }

    async fn upsert_setup(&self, guild_id: &str, text_id: &str, message_id: &str) -> Result<(), Error> {
        let now = Utc::now();
        let mut setups = self.setups.write().await;
        setups
            .entry(guild_id.to_string())
            .and_modify(|s| {
                s.text_id = text_id.to_string();
                s.message_id = message_id.to_string();
                s.updated_at = now;
            })
            .or_insert_with(|| SetupRecord {
                guild_id: guild_id.to_string(),
                text_id: text_id.to_string(),
                message_id: message_id.to_string(),
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn delete_setup(&self, guild_id: &str) -> Result<(), Error> {
        self.setups.write().await.remove(guild_id);
        Ok(())
    }
}
