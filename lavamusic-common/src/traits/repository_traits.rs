use async_trait::async_trait;

use crate::error::Error;
use crate::models::SetupRecord;

/// Per-guild setup-message storage.
#[async_trait]
pub trait SetupRepository: Send + Sync {
    async fn get_setup(&self, guild_id: &str) -> Result<Option<SetupRecord>, Error>;
    async fn upsert_setup(&self, guild_id: &str, text_id: &str, message_id: &str) -> Result<(), Error>;
    async fn delete_setup(&self, guild_id: &str) -> Result<(), Error>;
}
