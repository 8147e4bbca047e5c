//! pandud — pandu bot daemon.
//!
//! Long-polls the chat transport and serves directory lookups through the
//! result cache. All configuration comes from flags or environment
//! variables; the cache is optional and the daemon runs origin-only when it
//! is unreachable.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pandu::cache::{CacheConfig, CacheStore, DEFAULT_TTL_SECS};
use pandu::{Bot, CachedDirectory, DirectoryClient, Lifecycle, SessionStore, TelegramClient};

/// Nearby-building chat bot daemon.
#[derive(Parser)]
#[command(name = "pandud")]
#[command(about = "Nearby-building chat bot daemon")]
struct Args {
    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: String,

    /// Directory API base URL (e.g. https://directory.example/api).
    #[arg(long, env = "API_BASE_URL")]
    api_base_url: String,

    /// Directory API key.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: String,

    /// Cache backend connection string; wins over host+port when both set.
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    redis_url: Option<String>,

    /// Cache backend host.
    #[arg(long, env = "REDIS_HOST")]
    redis_host: Option<String>,

    /// Cache backend port.
    #[arg(long, env = "REDIS_PORT")]
    redis_port: Option<u16>,

    /// Cached record time-to-live in seconds.
    #[arg(long, env = "CACHE_TTL", default_value_t = DEFAULT_TTL_SECS)]
    cache_ttl: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let cache = Arc::new(CacheStore::new());
    let cache_config = CacheConfig {
        url: args.redis_url,
        host: args.redis_host,
        port: args.redis_port,
        ttl_secs: args.cache_ttl,
    };
    let lifecycle = Lifecycle::new(Arc::clone(&cache), cache_config);
    lifecycle.start().await;

    let origin = Arc::new(DirectoryClient::new(args.api_base_url, args.api_key));
    let directory = CachedDirectory::new(origin, Arc::clone(&cache));
    let chat = Arc::new(TelegramClient::new(&args.telegram_token));
    let bot = Arc::new(Bot::new(chat, directory, SessionStore::new()));

    info!("pandud running; send /start to the bot");
    let outcome = bot.run().await;

    lifecycle.stop().await;
    outcome.map_err(Into::into)
}
