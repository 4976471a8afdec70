// ABOUTME: Codegrant CLI - administrative tool for OAuth 2.0 client and token management
// ABOUTME: Registers clients, toggles their status, and purges expired tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Register a client (prints the secret once)
//! codegrant-cli client create --name "Demo App" --redirect-uri https://app.example.com/cb
//!
//! # List registered clients
//! codegrant-cli client list
//!
//! # Disable or re-enable a client
//! codegrant-cli client deactivate 6f1c...
//! codegrant-cli client activate 6f1c...
//!
//! # Delete expired codes and access tokens
//! codegrant-cli token purge
//! ```

mod commands;
mod helpers;

use std::env;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use codegrant_server::{
    config::ServerConfig,
    constants::{env_config, storage},
    database::{Database, SqliteClientRepository},
    errors::AppResult,
    oauth2_server::ClientRegistrationManager,
};
use tracing::info;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "codegrant-cli",
    about = "Codegrant Server Management CLI",
    long_about = "Command-line tool for registering OAuth 2.0 clients and maintaining issued tokens."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Client management commands
    Client {
        #[command(subcommand)]
        action: ClientCommand,
    },

    /// Token maintenance commands
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ClientCommand {
    /// Register a new client with generated credentials
    Create {
        /// Display name shown on the authorization page
        #[arg(long)]
        name: String,

        /// Redirect URI the client will present
        #[arg(long)]
        redirect_uri: String,
    },

    /// List registered clients
    List,

    /// Allow a client to obtain and exchange codes again
    Activate {
        /// Public client identifier
        client_id: String,
    },

    /// Stop a client from obtaining or exchanging codes
    Deactivate {
        /// Public client identifier
        client_id: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum TokenCommand {
    /// Delete expired authorization codes and access tokens
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let database_url = cli
        .database_url
        .or_else(|| env::var(env_config::DATABASE_URL).ok())
        .unwrap_or_else(|| storage::DEFAULT_DATABASE_URL.to_owned());

    info!("Connecting to database");
    let database = Arc::new(Database::new(&database_url).await?);

    match cli.command {
        Command::Client { action } => {
            let manager =
                ClientRegistrationManager::new(database, Arc::new(SqliteClientRepository));
            match action {
                ClientCommand::Create { name, redirect_uri } => {
                    commands::client::create(&manager, &name, &redirect_uri).await?;
                }
                ClientCommand::List => commands::client::list(&manager).await?,
                ClientCommand::Activate { client_id } => {
                    commands::client::activate(&manager, &client_id).await?;
                }
                ClientCommand::Deactivate { client_id } => {
                    commands::client::deactivate(&manager, &client_id).await?;
                }
            }
        }
        Command::Token { action } => match action {
            TokenCommand::Purge => {
                let config = ServerConfig::from_env()?;
                commands::token::purge(&database, &config).await?;
            }
        },
    }

    Ok(())
}
