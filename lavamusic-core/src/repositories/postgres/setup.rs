// lavamusic-core/src/repositories/postgres/setup.rs
//
// Stores the per-guild setup message (the player panel) in `guild_setups`.
// Guild, channel and message ids are kept as strings.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use lavamusic_common::error::Error;
use lavamusic_common::models::SetupRecord;
use lavamusic_common::traits::repository_traits::SetupRepository;

#[derive(Clone)]
pub struct PostgresSetupRepository {
    pool: Pool<Postgres>,
}

impl PostgresSetupRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SetupRepository for PostgresSetupRepository {
    async fn get_setup(&self, guild_id: &str) -> Result<Option<SetupRecord>, Error> {
        let q = r#"
            SELECT guild_id, text_id, message_id, created_at, updated_at
            FROM guild_setups
            WHERE guild_id = $1
        "#;
        let row_opt = sqlx::query(q)
            .bind(guild_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            Ok(Some(SetupRecord {
                guild_id:   r.try_get("guild_id")?,
                text_id:    r.try_get("text_id")?,
                message_id: r.try_get("message_id")?,
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn upsert_setup(&self, guild_id: &str, text_id: &str, message_id: &str) -> Result<(), Error> {
        let q = r#"
            INSERT INTO guild_setups (guild_id, text_id, message_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id)
            DO UPDATE SET text_id = EXCLUDED.text_id,
                          message_id = EXCLUDED.message_id,
                          updated_at = now()
        "#;
        sqlx::query(q)
            .bind(guild_id)
            .bind(text_id)
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_setup(&self, guild_id: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM guild_setups WHERE guild_id = $1")
            .bind(guild_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
