// File: src/platforms/discord/mod.rs

pub mod publisher;
pub mod runtime;

pub use publisher::TwilightCommandPublisher;
pub use runtime::{translate_event, DiscordGateway};
