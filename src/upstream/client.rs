//! Tracker Network profile API client.
//!
//! # Responsibilities
//! - Build the profile URL for a (platform, username) pair
//! - Send the credential in the `TRN-Api-Key` header
//! - Map HTTP and body-level failures to [`UpstreamError`]
//! - Extract kills, wins and K/D from `lifeTimeStats`

use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::upstream::types::{
    Credential, PlayerProfile, ProfileResponse, StatEntry, StatsProvider, UpstreamError,
    UpstreamResult,
};

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "TRN-Api-Key";

const KILLS_KEY: &str = "Kills";
const WINS_KEY: &str = "Wins";
const KDR_KEY: &str = "K/d";

/// HTTP client for the Tracker Network API.
#[derive(Clone)]
pub struct TrackerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TrackerClient {
    /// Create a client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url: Url = config
            .base_url
            .parse()
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("obs-fortnite/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::info!(base_url = %base_url, "Stats provider client initialized");
        Ok(Self { http, base_url })
    }

    /// `{base}/v1/profile/{platform}/{username}`, segments percent-encoded as given.
    pub fn profile_url(&self, platform: &str, username: &str) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", "profile", platform, username]);
        Ok(url)
    }
}

impl StatsProvider for TrackerClient {
    type Profile = TrackerProfile;

    async fn fetch_profile(
        &self,
        platform: &str,
        username: &str,
        credential: &Credential,
    ) -> UpstreamResult<TrackerProfile> {
        let url = self.profile_url(platform, username)?;

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, credential.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: ProfileResponse = response.json().await?;
        if let Some(message) = body.error {
            return Err(UpstreamError::Provider(message));
        }

        Ok(TrackerProfile::new(body.life_time_stats))
    }
}

/// Lifetime stats of one player as returned by the provider.
#[derive(Debug, Clone)]
pub struct TrackerProfile {
    stats: Vec<StatEntry>,
}

impl TrackerProfile {
    pub fn new(stats: Vec<StatEntry>) -> Self {
        Self { stats }
    }

    fn raw(&self, key: &'static str) -> UpstreamResult<&str> {
        self.stats
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
            .map(|entry| entry.value.trim())
            .ok_or(UpstreamError::MissingStat(key))
    }

    fn count(&self, key: &'static str) -> UpstreamResult<i64> {
        let raw = self.raw(key)?;
        strip_separators(raw)
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| UpstreamError::MalformedStat {
                key,
                value: raw.to_string(),
            })
    }

    fn ratio(&self, key: &'static str) -> UpstreamResult<f64> {
        let raw = self.raw(key)?;
        strip_separators(raw)
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| UpstreamError::MalformedStat {
                key,
                value: raw.to_string(),
            })
    }
}

impl PlayerProfile for TrackerProfile {
    async fn kills(&self) -> UpstreamResult<i64> {
        self.count(KILLS_KEY)
    }

    async fn wins(&self) -> UpstreamResult<i64> {
        self.count(WINS_KEY)
    }

    async fn kdr(&self) -> UpstreamResult<f64> {
        self.ratio(KDR_KEY)
    }
}

/// The provider formats large numbers as "1,234".
fn strip_separators(raw: &str) -> String {
    raw.chars().filter(|c| *c != ',').collect()
}
