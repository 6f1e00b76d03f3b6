// File: src/services/mod.rs

pub mod setup_buttons;
pub mod slash_sync;

pub use setup_buttons::SetupButtonRouter;
pub use slash_sync::{CommandPublisher, PublishScope, SlashCommandSynchronizer};
