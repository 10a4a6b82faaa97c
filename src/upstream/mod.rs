//! Stats provider integration subsystem.
//!
//! # Data Flow
//! ```text
//! FORTNITE_TRACKER_TOKEN (read per lookup)
//!     → types.rs (Credential, provider traits, errors)
//!     → client.rs (GET /v1/profile/{platform}/{username})
//!     → TrackerProfile (kills / wins / K/D accessors)
//! ```
//!
//! # Security Constraints
//! - The credential only ever leaves the process in the request header
//! - `Credential` formats as `<redacted>` so it cannot end up in logs

pub mod client;
pub mod types;

pub use client::{TrackerClient, TrackerProfile};
pub use types::{Credential, PlayerProfile, StatEntry, StatsProvider, UpstreamError, UpstreamResult};
