//! Mapping lookup failures to HTTP responses.
//!
//! Failures never carry error text: the body is always the all-sentinel
//! [`StatsResult`]. Provider failures and timed-out lookups are 500, shed
//! lookups are 429.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::gateway::{LookupError, StatsResult};

impl LookupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LookupError::Upstream(_) | LookupError::TimedOut(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            LookupError::Shed(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(StatsResult::failed())).into_response()
    }
}
