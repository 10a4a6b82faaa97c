//! Inbound lookup and normalized result types.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::resilience::PermitError;
use crate::upstream::UpstreamError;

/// Value placed in every field of a failed lookup.
pub const SENTINEL: i64 = -1;

/// Player name and platform exactly as they appeared in the request path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupRequest {
    pub platform: String,
    pub username: String,
}

/// Normalized lifetime stats returned to the caller.
///
/// Either every field is non-negative or every field is the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    pub kills: i64,
    pub wins: i64,
    pub kdr: f64,
}

impl StatsResult {
    /// The all-sentinel payload sent on any failure.
    pub const fn failed() -> Self {
        Self {
            kills: SENTINEL,
            wins: SENTINEL,
            kdr: SENTINEL as f64,
        }
    }

    pub fn is_failed(&self) -> bool {
        *self == Self::failed()
    }
}

/// Why a lookup produced no stats.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Shed(#[from] PermitError),

    #[error("lookup did not finish within {0:?}")]
    TimedOut(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_payload_shape() {
        let json = serde_json::to_value(StatsResult::failed()).unwrap();
        assert_eq!(json, serde_json::json!({"kills": -1, "wins": -1, "kdr": -1.0}));
        assert!(StatsResult::failed().is_failed());
    }

    #[test]
    fn test_success_payload_shape() {
        let stats = StatsResult {
            kills: 100,
            wins: 10,
            kdr: 2.5,
        };
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"kills":100,"wins":10,"kdr":2.5}"#
        );
        assert!(!stats.is_failed());
    }
}
