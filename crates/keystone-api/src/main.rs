//! Keystone server
//!
//! Loads configuration, seeds the in-memory identity provider, and serves
//! the HTTP API.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use keystone_api::{logging, AppState, KeystoneConfig, Server};
use keystone_auth_memory::InMemoryIdentityProvider;

/// Keystone - authentication API server
#[derive(Parser, Debug)]
#[command(name = "keystone")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (falls back to $KEYSTONE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = KeystoneConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init(&config.logging.level)?;

    let provider = Arc::new(InMemoryIdentityProvider::new());
    for seed in &config.users {
        provider.seed(seed).await?;
    }
    if provider.is_empty()? {
        tracing::warn!("No users configured; every login will be rejected until one is created");
    }

    Server::new(config.server.clone(), AppState::new(provider))
        .run()
        .await?;

    Ok(())
}
