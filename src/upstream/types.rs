//! Provider-facing types, the provider traits and error definitions.

use serde::Deserialize;
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur while talking to the stats provider.
///
/// The gateway treats every variant the same way; the split exists for
/// logging only.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, timeout or body decoding failure.
    #[error("request to stats provider failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status.
    #[error("stats provider returned status {0}")]
    Status(u16),

    /// Provider answered 2xx but reported an error in the body
    /// (unknown player, bad key, ...).
    #[error("stats provider error: {0}")]
    Provider(String),

    /// Profile did not contain the requested lifetime stat.
    #[error("stat '{0}' missing from profile")]
    MissingStat(&'static str),

    /// Lifetime stat present but not a non-negative number.
    #[error("stat '{key}' has malformed value '{value}'")]
    MalformedStat { key: &'static str, value: String },

    /// Base URL cannot carry path segments.
    #[error("invalid stats provider URL: {0}")]
    InvalidUrl(String),
}

/// Result type for provider operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// API credential for the stats provider.
///
/// Opaque to the gateway. Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the credential from an environment variable.
    /// An unset variable yields an empty credential; the provider rejects it.
    pub fn from_env(var: &str) -> Self {
        Self(std::env::var(var).unwrap_or_default())
    }

    /// The raw token, for placing in the outbound request only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// A source of player profiles.
pub trait StatsProvider: Send + Sync + 'static {
    type Profile: PlayerProfile;

    /// Look up one player. A single attempt, no retries.
    fn fetch_profile(
        &self,
        platform: &str,
        username: &str,
        credential: &Credential,
    ) -> impl Future<Output = UpstreamResult<Self::Profile>> + Send;
}

/// Lifetime statistics of one player. Each accessor may fail on its own.
pub trait PlayerProfile: Send + Sync {
    fn kills(&self) -> impl Future<Output = UpstreamResult<i64>> + Send;

    fn wins(&self) -> impl Future<Output = UpstreamResult<i64>> + Send;

    fn kdr(&self) -> impl Future<Output = UpstreamResult<f64>> + Send;
}

/// Profile document returned by the Tracker Network API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileResponse {
    #[serde(default)]
    pub life_time_stats: Vec<StatEntry>,
    pub error: Option<String>,
}

/// One `{"key": ..., "value": ...}` pair of `lifeTimeStats`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StatEntry {
    pub key: String,
    pub value: String,
}
