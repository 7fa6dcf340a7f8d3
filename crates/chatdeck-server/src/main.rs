//! chatdeck HTTP server

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatdeck_server::{http, AppState, Config};

/// chatdeck chat server.
#[derive(Parser, Debug)]
#[command(name = "chatdeck-server", about = "chatdeck HTTP server")]
struct Args {
    /// HTTP server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    http_addr: String,

    /// Public base URL used in magic links
    #[arg(long, default_value = "http://localhost:3000")]
    public_url: String,

    /// Magic link validity in minutes
    #[arg(long, default_value = "15")]
    magic_link_ttl_minutes: u64,

    /// Session validity in hours
    #[arg(long, default_value = "168")]
    session_ttl_hours: u64,

    /// Start with an empty chat store instead of the demo conversations
    #[arg(long)]
    no_seed: bool,

    /// Return magic links in HTTP responses (development only)
    #[arg(long)]
    expose_magic_links: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            http_bind_addr: args.http_addr,
            public_base_url: args.public_url,
            magic_link_ttl_minutes: args.magic_link_ttl_minutes,
            session_ttl_hours: args.session_ttl_hours,
            seed_chats: !args.no_seed,
            expose_magic_links: args.expose_magic_links,
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("chatdeck_server=info".parse()?))
        .with_target(true)
        .init();

    let config = Config::from(args);
    config.validate()?;
    let http_addr: SocketAddr = config.http_bind_addr.parse()?;
    let seeded = config.seed_chats;

    let state = AppState::new(config);
    let router = http::create_router(state);

    let listener = TcpListener::bind(http_addr).await?;
    info!(http_addr = %http_addr, seeded, "chatdeck server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
