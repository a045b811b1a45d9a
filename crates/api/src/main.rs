// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet Guard API Server
//!
//! Resolves Xion wallets against racing Cosmos REST nodes and serves trust
//! snapshots, risk scores, pain.001 exports and real-world asset listings.

use anyhow::Result;
use api::{Server, ServerConfig, ShutdownConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        address = %config.socket_addr(),
        network = %config.resolver.network,
        fallback = config.resolver.fallback.enabled,
        asset_sources = config.rwa.sources.len(),
        "starting wallet guard server"
    );

    let server = Server::new(config, ShutdownConfig::default())?;

    // The main task only waits; the server runs on a worker
    tokio::spawn(async move { server.run().await }).await??;

    info!("wallet guard server stopped");
    Ok(())
}
