// ABOUTME: Association between a registered client and a token it owns
// ABOUTME: Each token belongs to at most one client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;

/// Link from a token to the client that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientTokenLink {
    /// Internal id of the owning client
    pub client_ref: i64,
    /// Token service id of the owned token (unique)
    pub token_ref: i64,
}
