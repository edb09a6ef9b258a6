//! Runner domain model
//!
//! Represents a self-hosted runner registered in a workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status values the server is known to report.
///
/// Status is kept as a plain string on [`State`]; the server may introduce
/// values not listed here and the client passes them through untouched.
pub mod status {
    pub const UNREGISTERED: &str = "UNREGISTERED";
    pub const ONLINE: &str = "ONLINE";
    pub const OFFLINE: &str = "OFFLINE";
    pub const ENABLED: &str = "ENABLED";
    pub const DISABLED: &str = "DISABLED";
}

/// A runner resource as returned by the server
///
/// Only `uuid` is mandatory. Every other field falls back to its default when
/// the server omits it or sends `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runner {
    /// Server-assigned identifier, stable for the lifetime of the runner
    #[serde(deserialize_with = "non_empty")]
    pub uuid: String,

    /// Name given at creation
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Labels used to route pipeline steps to this runner
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,

    /// Current state of the runner
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: State,

    /// Credentials issued for the runner to authenticate itself
    #[serde(default, deserialize_with = "null_as_default")]
    pub oauth_client: OauthClient,

    /// When the runner was created
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_on: DateTime<Utc>,

    /// Last time the runner resource changed
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_on: DateTime<Utc>,
}

impl Runner {
    /// Returns true if the runner carries the given label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Returns true if the server excluded this runner from scheduling
    pub fn is_cordoned(&self) -> bool {
        self.state.cordoned
    }
}

/// Runner state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Status string, e.g. `UNREGISTERED` or `DISABLED`
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    /// Time of the last status change
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_on: DateTime<Utc>,

    /// Set by the server when the runner is excluded from scheduling
    #[serde(default, deserialize_with = "null_as_default")]
    pub cordoned: bool,
}

impl State {
    /// Check whether the current status matches `status`
    pub fn is(&self, status: &str) -> bool {
        self.status == status
    }
}

/// OAuth client issued by the server to a runner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthClient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_endpoint: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience: String,
}

/// Deserialize `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(serde::de::Error::custom("uuid must not be empty"));
    }
    Ok(value)
}
