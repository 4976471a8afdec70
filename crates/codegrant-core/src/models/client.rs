// ABOUTME: Registered OAuth 2.0 client model and its lifecycle status
// ABOUTME: Clients are created by an operator and looked up by public id or internal id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a registered client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    /// Client may obtain codes and tokens
    #[default]
    Active,
    /// Client is treated as unknown at authorization and rejected at token exchange
    Inactive,
}

impl ClientStatus {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            other => Err(format!("Unknown client status: {other}")),
        }
    }
}

/// Stored OAuth 2.0 client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuth2Client {
    /// Internal database id, referenced by client-token links
    pub id: i64,
    /// Public client identifier presented on the wire
    pub client_id: String,
    /// Shared secret presented at the token endpoint
    #[serde(skip_serializing)]
    pub client_secret: String,
    /// Human-readable client name shown on the consent page
    pub name: String,
    /// The single registered redirect URI
    pub redirect_uri: String,
    /// Lifecycle status
    pub status: ClientStatus,
    /// When the client was registered
    pub date_created: DateTime<Utc>,
}

impl OAuth2Client {
    /// Whether this client may currently take part in the code grant
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_form() {
        assert_eq!("ACTIVE".parse::<ClientStatus>(), Ok(ClientStatus::Active));
        assert_eq!(ClientStatus::Inactive.as_str(), "INACTIVE");
        assert!("DISABLED".parse::<ClientStatus>().is_err());
    }

    #[test]
    fn test_secret_is_never_serialized() {
        let client = OAuth2Client {
            id: 1,
            client_id: "c1".to_owned(),
            client_secret: "s1".to_owned(),
            name: "Demo".to_owned(),
            redirect_uri: "https://app/cb".to_owned(),
            status: ClientStatus::default(),
            date_created: Utc::now(),
        };

        let json = serde_json::to_string(&client).unwrap();
        assert!(!json.contains("s1"));
        assert!(json.contains("\"status\":\"ACTIVE\""));
        assert!(client.is_active());
    }
}
