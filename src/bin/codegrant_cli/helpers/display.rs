// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Output formatting helpers for codegrant-cli
// ABOUTME: Provides consistent display functions for registered clients

use codegrant_server::models::OAuth2Client;

/// Display a newly registered client, including its one-time secret
pub fn display_registered_client(client: &OAuth2Client) {
    println!("\nOAuth2 Client Registered Successfully!");
    println!("{}", "=".repeat(80));
    println!("   Name:          {}", client.name);
    println!("   Redirect URI:  {}", client.redirect_uri);
    println!("   Status:        {}", client.status);
    println!("   Created:       {}", client.date_created.format("%Y-%m-%d %H:%M UTC"));
    println!("{}", "=".repeat(80));
    println!("   client_id:     {}", client.client_id);
    println!("   client_secret: {}", client.client_secret);
    println!("{}", "=".repeat(80));

    println!("\nSECURITY NOTES:");
    println!("• The client secret is shown ONLY ONCE - store it with the client now");
    println!("• Never commit the secret to version control");
    println!("• The client must present exactly the redirect URI registered above");
}

/// Display registered clients as a table, without secrets
pub fn display_client_table(clients: &[OAuth2Client]) {
    println!(
        "{:<38} {:<24} {:<9} {:<17} REDIRECT URI",
        "CLIENT ID", "NAME", "STATUS", "CREATED"
    );
    println!("{}", "-".repeat(100));
    for client in clients {
        println!(
            "{:<38} {:<24} {:<9} {:<17} {}",
            client.client_id,
            truncate(&client.name, 24),
            client.status.as_str(),
            client.date_created.format("%Y-%m-%d %H:%M"),
            client.redirect_uri
        );
    }
    println!("\n{} client(s)", clients.len());
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_owned();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
