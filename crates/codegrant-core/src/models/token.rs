// ABOUTME: Token records owned by the token service
// ABOUTME: Distinguishes authorization codes from access and refresh tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of token held by the token service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    /// Bearer credential for API access
    Access,
    /// Single-use authorization code
    Authorization,
    /// Refresh token (stored type only, never issued by the code grant)
    Refresh,
}

impl TokenType {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "ACCESS",
            Self::Authorization => "AUTHORIZATION",
            Self::Refresh => "REFRESH",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCESS" => Ok(Self::Access),
            "AUTHORIZATION" => Ok(Self::Authorization),
            "REFRESH" => Ok(Self::Refresh),
            other => Err(format!("Unknown token type: {other}")),
        }
    }
}

/// Token metadata as read back from the token service
///
/// The token value itself is never stored, so it is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Token service identifier
    pub id: i64,
    /// Token kind
    pub token_type: TokenType,
    /// User the token was issued for
    pub user_id: i64,
    /// Issue time
    pub date_created: DateTime<Utc>,
    /// Expiry time
    pub date_expired: DateTime<Utc>,
}

impl TokenRecord {
    /// Whether the token has passed its expiry at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.date_expired <= now
    }

    /// Seconds of lifetime left at `now`, clamped at zero
    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.date_expired - now).num_seconds().max(0)
    }
}

/// A freshly created token: the value is only available at issue time
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Opaque token value handed to the caller
    pub value: String,
    /// Stored metadata
    pub record: TokenRecord,
}
