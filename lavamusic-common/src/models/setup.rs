use chrono::{DateTime, Utc};

/// The per-guild "setup" message: a pinned player panel whose buttons are
/// routed as `setupButtons` events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupRecord {
    pub guild_id: String,
    pub text_id: String,
    pub message_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SetupRecord {
    pub fn matches(&self, channel_id: &str, message_id: &str) -> bool {
        self.text_id == channel_id && self.message_id == message_id
    }
}
