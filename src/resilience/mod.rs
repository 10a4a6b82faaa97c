//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Lookup toward the stats provider:
//!     → rate_limit.rs (wait for the shared permit)
//!     → upstream client (bounded by its own request timeout)
//! ```
//!
//! There are no retries or circuit breaking: a failed provider call is
//! reported to the caller as-is.

pub mod rate_limit;

pub use rate_limit::{PermitError, UpstreamRateLimiter};
