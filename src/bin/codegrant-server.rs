// ABOUTME: Standalone HTTP server for the OAuth 2.0 authorization-code grant
// ABOUTME: Loads configuration, opens storage, and serves the router until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Codegrant Server Binary
//!
//! Serves the authorization and token endpoints plus `/health`. User
//! authentication is delegated to an upstream proxy that sets the configured
//! user header.

use std::future;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use codegrant_server::{
    config::{OAuth2Config, ServerConfig},
    logging,
    resources::ServerResources,
    routes,
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "codegrant-server")]
#[command(about = "OAuth 2.0 authorization-code grant server")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting codegrant server");
    info!("{}", config.summary());

    let bind_address = config.bind_address();
    let oauth2 = config.oauth2.clone(); // Safe: Clone for endpoint listing after config moves
    let resources = Arc::new(ServerResources::from_config(config).await?);
    let app = routes::router(resources);

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server listening on http://{bind_address}");
    display_available_endpoints(&bind_address, &oauth2);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

fn display_available_endpoints(address: &str, oauth2: &OAuth2Config) {
    info!("=== Available API Endpoints ===");
    info!("   Authorization:  GET  http://{address}/{}", oauth2.authorize_route);
    info!("   Token Exchange: POST http://{address}/{}", oauth2.token_route);
    info!("   Health:         GET  http://{address}/health");
    info!("=== End of Endpoint List ===");
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
