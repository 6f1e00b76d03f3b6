//! lavamusic-server/src/server.rs
//!
//! Turns the CLI arguments into a `BotConfig`, wires the real collaborators
//! and runs the bot until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use lavamusic_common::models::NodeDescriptor;
use lavamusic_common::traits::repository_traits::SetupRepository;
use lavamusic_core::lifecycle::Collaborators;
use lavamusic_core::platforms::discord::{DiscordGateway, TwilightCommandPublisher};
use lavamusic_core::repositories::{InMemorySetupRepository, PostgresSetupRepository};
use lavamusic_core::{BotConfig, BotLifecycle, Database, DefaultHttpClient, Error};

use crate::catalog;
use crate::plugins;
use crate::Args;

pub fn build_config(args: &Args) -> BotConfig {
    let nodes = match &args.lavalink_url {
        Some(url) => vec![NodeDescriptor {
            name: args.lavalink_name.clone(),
            url: url.clone(),
            auth: args.lavalink_auth.clone(),
            secure: args.lavalink_secure,
        }],
        None => Vec::new(),
    };

    BotConfig {
        token: args.token.clone(),
        client_id: args.client_id,
        prefix: args.prefix.clone(),
        owner_ids: args.owner_ids.clone(),
        guild_id: args.guild_id,
        production: args.production,
        default_language: args.default_language.clone(),
        locales_dir: PathBuf::from(&args.locales_dir),
        database_url: args.database_url.clone(),
        auto_node: args.auto_node,
        node_discovery_url: args.node_discovery_url.clone(),
        nodes,
        setup_listener: !args.no_setup_listener,
    }
}

async fn setup_repository(config: &BotConfig) -> Result<Arc<dyn SetupRepository>, Error> {
    match &config.database_url {
        Some(url) => {
            info!("Using Postgres DB URL: {}", url);
            let db = Database::new(url).await?;
            db.migrate().await?;
            Ok(Arc::new(PostgresSetupRepository::new(db.pool().clone())))
        }
        None => {
            warn!("No DATABASE_URL set; setup messages are kept in memory only.");
            Ok(Arc::new(InMemorySetupRepository::new()))
        }
    }
}

pub async fn run_server(args: Args) -> Result<(), Error> {
    let config = build_config(&args);
    config.validate()?;

    let setups = setup_repository(&config).await?;
    let collaborators = Collaborators {
        http: Arc::new(DefaultHttpClient::new()),
        setups,
        publisher: Arc::new(TwilightCommandPublisher::new(&config.token)),
        gateway: Box::new(DiscordGateway::new()),
    };

    let lifecycle = BotLifecycle::new(config, collaborators).with_plugins(plugins::compiled_in());
    let bot = lifecycle
        .start(&catalog::commands(), &catalog::events())
        .await?;
    info!(
        "Lavamusic is live: {} command(s) in {:?}",
        bot.commands.len(),
        bot.commands.categories()
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Ctrl-C handler error: {:?}", e);
    }
    info!("Ctrl-C detected; shutting down.");
    bot.shutdown().await?;
    info!("Server shutdown complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn static_node_comes_from_lavalink_args() {
        let args = Args::parse_from([
            "lavamusic",
            "--token",
            "abc",
            "--lavalink-url",
            "localhost:2333",
            "--lavalink-secure",
            "true",
            "--production",
            "false",
            "--guild-id",
            "77",
        ]);
        let config = build_config(&args);

        assert_eq!(config.nodes.len(), 1);
        assert_eq!(config.nodes[0].url, "localhost:2333");
        assert!(config.nodes[0].secure);
        assert!(!config.production);
        assert_eq!(config.guild().map(|g| g.get()), Some(77));
        assert!(config.setup_listener);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_nodes_fail_validation() {
        let args = Args::parse_from(["lavamusic", "--token", "abc"]);
        let config = build_config(&args);
        assert!(config.nodes.is_empty());
        assert!(config.validate().is_err());
    }
}
