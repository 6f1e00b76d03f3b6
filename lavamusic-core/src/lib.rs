// src/lib.rs

pub mod audio;
pub mod commands;
pub mod config;
pub mod context;
pub mod db;
pub mod eventbus;
pub mod events;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod loader;
pub mod platforms;
pub mod plugins;
pub mod repositories;
pub mod services;
pub mod test_utils;

pub use config::BotConfig;
pub use context::{Bot, BotContext};
pub use db::Database;
pub use lavamusic_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient};
pub use lifecycle::{BotLifecycle, LifecycleState, LiveBot};
