//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! The provider credential is never a log field.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
