// ABOUTME: Client management commands for codegrant-cli
// ABOUTME: Handles create, list, activate, and deactivate operations for OAuth 2.0 clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use codegrant_server::{
    errors::AppResult, models::ClientStatus, oauth2_server::ClientRegistrationManager,
};
use tracing::info;

use crate::helpers::display::{display_client_table, display_registered_client};

type Result<T> = AppResult<T>;

/// Register a client and print its credentials
pub async fn create(manager: &ClientRegistrationManager, name: &str, redirect_uri: &str) -> Result<()> {
    let client = manager.register_client(name, redirect_uri).await?;
    display_registered_client(&client);
    Ok(())
}

/// Print every registered client
pub async fn list(manager: &ClientRegistrationManager) -> Result<()> {
    let clients = manager.list_clients().await?;
    if clients.is_empty() {
        println!("No clients registered.");
        return Ok(());
    }
    display_client_table(&clients);
    Ok(())
}

/// Mark a client active
pub async fn activate(manager: &ClientRegistrationManager, client_id: &str) -> Result<()> {
    manager.set_status(client_id, ClientStatus::Active).await?;
    info!(client_id = %client_id, "Client activated");
    println!("Client {client_id} is now ACTIVE");
    Ok(())
}

/// Mark a client inactive
pub async fn deactivate(manager: &ClientRegistrationManager, client_id: &str) -> Result<()> {
    manager.set_status(client_id, ClientStatus::Inactive).await?;
    info!(client_id = %client_id, "Client deactivated");
    println!("Client {client_id} is now INACTIVE");
    Ok(())
}
