//! Rate-limited Fortnite stats gateway.
//!
//! Proxies player stat lookups to the Tracker Network API through a single
//! process-wide gate that admits one outbound call per interval, and serves
//! the form and widget pages used as an OBS browser source.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::GatewayConfig;
pub use gateway::{Gateway, StatsResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
