// ABOUTME: Persisted data models for the authorization server
// ABOUTME: Registered clients, stored tokens, and the client-token association
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Data models shared by storage, endpoints, and the CLI.

/// Registered client applications
pub mod client;
/// Client-token association records
pub mod client_token;
/// Token records and token types
pub mod token;

pub use client::{ClientStatus, OAuth2Client};
pub use client_token::ClientTokenLink;
pub use token::{IssuedToken, TokenRecord, TokenType};
