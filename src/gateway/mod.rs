//! Rate-limited stats gateway.
//!
//! # Data Flow
//! ```text
//! GET /obs/fortnite/{platform}/{username}
//!     → LookupRequest (path segments, unvalidated)
//!     → lookup.rs: permit → fetch_profile → kills → wins → kdr
//!     → StatsResult, or LookupError mapped to the sentinel payload
//! ```

pub mod lookup;
pub mod types;

pub use lookup::{CredentialSource, Gateway};
pub use types::{LookupError, LookupRequest, StatsResult, SENTINEL};
