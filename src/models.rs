// ABOUTME: Re-exports OAuth 2.0 protocol models from the core crate
// ABOUTME: Clients, token records, and client-token links shared by storage and endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! The model types live in `codegrant-core` so external tooling can depend on
//! them without pulling in the server; this module keeps the
//! `codegrant_server::models` path stable.

pub use codegrant_core::models::{
    ClientStatus, ClientTokenLink, IssuedToken, OAuth2Client, TokenRecord, TokenType,
};
