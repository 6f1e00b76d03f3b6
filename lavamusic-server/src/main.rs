use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod catalog;
mod plugins;
mod server;

use server::run_server;

#[derive(Parser, Debug, Clone)]
#[command(name = "lavamusic")]
#[command(author, version, about = "Lavamusic - Discord music bot backed by Lavalink nodes")]
pub struct Args {
    /// Discord bot token.
    #[arg(long, env = "TOKEN", hide_env_values = true)]
    pub token: String,

    /// Application id; taken from READY when unset.
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: Option<u64>,

    #[arg(long, env = "PREFIX", default_value = "!")]
    pub prefix: String,

    /// Comma-separated user ids allowed to run developer commands.
    #[arg(long, env = "OWNER_IDS", value_delimiter = ',')]
    pub owner_ids: Vec<u64>,

    /// Guild that receives slash commands when not in production.
    #[arg(long, env = "GUILD_ID")]
    pub guild_id: Option<u64>,

    #[arg(long, env = "PRODUCTION", default_value_t = true, action = clap::ArgAction::Set)]
    pub production: bool,

    #[arg(long, env = "DEFAULT_LANGUAGE", default_value = "en-US")]
    pub default_language: String,

    #[arg(long, env = "LOCALES_DIR", default_value = "locales")]
    pub locales_dir: String,

    /// Postgres URL for setup records. Without it they are kept in memory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Fetch public nodes instead of using the LAVALINK_* settings.
    #[arg(long, env = "AUTO_NODE", default_value_t = false, action = clap::ArgAction::Set)]
    pub auto_node: bool,

    #[arg(long, env = "NODE_DISCOVERY_URL", default_value = lavamusic_core::audio::discovery::DEFAULT_DISCOVERY_URL)]
    pub node_discovery_url: String,

    #[arg(long, env = "LAVALINK_URL")]
    pub lavalink_url: Option<String>,

    #[arg(long, env = "LAVALINK_AUTH", default_value = "youshallnotpass", hide_env_values = true)]
    pub lavalink_auth: String,

    #[arg(long, env = "LAVALINK_NAME", default_value = "Lavamusic")]
    pub lavalink_name: String,

    #[arg(long, env = "LAVALINK_SECURE", default_value_t = false, action = clap::ArgAction::Set)]
    pub lavalink_secure: bool,

    /// Turn off re-emitting setup-message button presses.
    #[arg(long, default_value = "false")]
    pub no_setup_listener: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("lavamusic=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!(
        "Lavamusic starting. production={}, auto_node={}, locales={}",
        args.production, args.auto_node, args.locales_dir
    );

    if let Err(e) = run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}
