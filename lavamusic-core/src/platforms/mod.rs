// File: src/platforms/mod.rs

use async_trait::async_trait;

use crate::eventbus::EventBus;
use crate::events::PlatformEvent;
use crate::Error;

pub mod discord;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error(String),
}

/// The chat-platform connection. `login` must fail if the connection cannot
/// be established; once it returns, inbound events flow onto `events`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&mut self, token: &str, events: EventBus<PlatformEvent>) -> Result<(), Error>;
    async fn disconnect(&mut self) -> Result<(), Error>;
    fn status(&self) -> ConnectionStatus;
}
