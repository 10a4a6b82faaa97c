//! One rate-limited lookup, end to end.
//!
//! # Order of operations
//! 1. Resolve the credential (fresh on every lookup)
//! 2. Wait for the shared upstream permit
//! 3. Fetch the profile; stop on failure
//! 4. Read kills, wins, K/D in sequence; stop at the first failure
//! 5. Assemble the result only once all three are known

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::gateway::types::{LookupError, LookupRequest, StatsResult};
use crate::observability::metrics;
use crate::resilience::UpstreamRateLimiter;
use crate::upstream::{Credential, PlayerProfile, StatsProvider, UpstreamResult};

/// Where the provider credential comes from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read the named environment variable on every lookup.
    Env(String),
    /// A fixed credential.
    Fixed(Credential),
}

impl CredentialSource {
    pub fn resolve(&self) -> Credential {
        match self {
            CredentialSource::Env(var) => Credential::from_env(var),
            CredentialSource::Fixed(credential) => credential.clone(),
        }
    }
}

/// Forwards lookups to a [`StatsProvider`] behind the shared rate limiter.
pub struct Gateway<P> {
    provider: P,
    limiter: Arc<UpstreamRateLimiter>,
    credentials: CredentialSource,
    max_wait: Option<Duration>,
}

impl<P: StatsProvider> Gateway<P> {
    pub fn new(provider: P, limiter: Arc<UpstreamRateLimiter>, credentials: CredentialSource) -> Self {
        Self {
            provider,
            limiter,
            credentials,
            max_wait: None,
        }
    }

    /// Shed lookups that cannot get a permit within `max_wait`.
    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Run one lookup.
    pub async fn lookup(&self, request: &LookupRequest) -> Result<StatsResult, LookupError> {
        let credential = self.credentials.resolve();
        if credential.is_empty() {
            tracing::warn!("No stats provider credential configured");
        }

        let waiting = Instant::now();
        match self.max_wait {
            Some(max_wait) => {
                if let Err(e) = self.limiter.acquire_within(max_wait).await {
                    metrics::record_permit_shed();
                    metrics::record_lookup("shed");
                    return Err(e.into());
                }
            }
            None => self.limiter.acquire().await,
        }
        metrics::record_permit_wait(waiting);

        tracing::debug!(
            platform = %request.platform,
            username = %request.username,
            waited_ms = waiting.elapsed().as_millis() as u64,
            "Upstream permit granted"
        );

        let started = Instant::now();
        let result = self.fetch(request, &credential).await;
        metrics::record_upstream_duration(started);

        match result {
            Ok(stats) => {
                metrics::record_lookup("success");
                Ok(stats)
            }
            Err(e) => {
                metrics::record_lookup("upstream_error");
                Err(e.into())
            }
        }
    }

    async fn fetch(&self, request: &LookupRequest, credential: &Credential) -> UpstreamResult<StatsResult> {
        let profile = self
            .provider
            .fetch_profile(&request.platform, &request.username, credential)
            .await?;

        let kills = profile.kills().await?;
        let wins = profile.wins().await?;
        let kdr = profile.kdr().await?;

        Ok(StatsResult { kills, wins, kdr })
    }
}
