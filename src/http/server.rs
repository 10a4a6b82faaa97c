//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the lookup handler and page routes
//! - Wire up middleware (request ID, tracing)
//! - Build the shared rate limiter and the provider client once
//! - Serve until the shutdown signal fires

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, Uri},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::gateway::{CredentialSource, Gateway, LookupError, LookupRequest, StatsResult};
use crate::http::pages;
use crate::http::request::{lossy_lookup_request, request_id, UuidRequestId};
use crate::lifecycle::shutdown::wait_for_trigger;
use crate::observability::metrics;
use crate::resilience::UpstreamRateLimiter;
use crate::upstream::{StatsProvider, TrackerClient, UpstreamError, UpstreamResult};

/// Route of the rate-limited lookup.
pub const LOOKUP_ROUTE: &str = "/obs/fortnite/{platform}/{username}";

const LOOKUP_PREFIX: &str = "/obs/fortnite";

/// Application state injected into handlers.
pub struct AppState<P> {
    pub gateway: Arc<Gateway<P>>,
    /// Upper bound on one lookup, permit wait included.
    pub request_timeout: Option<Duration>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

/// HTTP server for the stats gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server talking to the Tracker Network API.
    ///
    /// Must be called from within a Tokio runtime (the rate limiter starts
    /// ticking here).
    pub fn new(config: GatewayConfig) -> UpstreamResult<Self> {
        let client = TrackerClient::new(&config.upstream)?;
        Ok(Self::with_provider(config, client))
    }

    /// Create a server with an arbitrary stats provider.
    pub fn with_provider<P: StatsProvider>(config: GatewayConfig, provider: P) -> Self {
        let limiter = Arc::new(UpstreamRateLimiter::new(Duration::from_millis(
            config.rate_limit.interval_ms,
        )));
        let credentials = CredentialSource::Env(config.upstream.token_env.clone());
        let gateway = Gateway::new(provider, limiter, credentials)
            .with_max_wait(config.rate_limit.max_wait_secs.map(Duration::from_secs));

        let state = AppState {
            gateway: Arc::new(gateway),
            request_timeout: config.timeouts.request_secs.map(Duration::from_secs),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<P: StatsProvider>(config: &GatewayConfig, state: AppState<P>) -> Router {
        Router::new()
            .route(LOOKUP_ROUTE, get(lookup_handler::<P>))
            .with_state(state)
            .merge(pages::routes(&config.static_files))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            interval_ms = self.config.rate_limit.interval_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_trigger(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Rate-limited stats lookup.
///
/// Path segments are forwarded as decoded, without validation. Segments
/// that are not UTF-8 are decoded lossily instead of being rejected.
async fn lookup_handler<P: StatsProvider>(
    State(state): State<AppState<P>>,
    path: Result<Path<LookupRequest>, PathRejection>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<StatsResult>, LookupError> {
    let request_id = request_id(&headers);
    let request = match path {
        Ok(Path(request)) => request,
        Err(rejection) => {
            tracing::debug!(request_id = %request_id, error = %rejection, "Decoding lookup path lossily");
            lossy_lookup_request(uri.path(), LOOKUP_PREFIX)
                .ok_or_else(|| UpstreamError::InvalidUrl(uri.path().to_string()))?
        }
    };
    tracing::info!(
        request_id = %request_id,
        platform = %request.platform,
        username = %request.username,
        "Stats lookup"
    );

    let result = match state.request_timeout {
        Some(limit) => match tokio::time::timeout(limit, state.gateway.lookup(&request)).await {
            Ok(result) => result,
            Err(_) => {
                metrics::record_lookup("timed_out");
                Err(LookupError::TimedOut(limit))
            }
        },
        None => state.gateway.lookup(&request).await,
    };

    match result {
        Ok(stats) => {
            tracing::info!(
                request_id = %request_id,
                kills = stats.kills,
                wins = stats.wins,
                kdr = stats.kdr,
                "Stats lookup succeeded"
            );
            Ok(Json(stats))
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Error proxying stats request");
            Err(e)
        }
    }
}
