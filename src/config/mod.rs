//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize, apply PORT override)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to HttpServer at startup
//! ```
//!
//! The config is loaded once. The rate limiter interval in particular is
//! fixed for the process lifetime, so there is no reload path.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, RateLimitConfig,
    StaticFilesConfig, TimeoutConfig, UpstreamConfig,
};
