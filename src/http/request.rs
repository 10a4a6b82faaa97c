//! Request identification and lookup path parsing.
//!
//! Every inbound request gets an `x-request-id` (UUID v4) unless the caller
//! already sent one. The same id is echoed on the response and attached to
//! lookup log lines.

use axum::http::{HeaderMap, HeaderValue, Request};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::gateway::LookupRequest;

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request id of an inbound request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Read `{platform}/{username}` from the raw path below `prefix`.
///
/// Segments are percent-decoded lossily: bytes that are not UTF-8 become
/// U+FFFD instead of rejecting the request.
pub fn lossy_lookup_request(path: &str, prefix: &str) -> Option<LookupRequest> {
    let rest = path.strip_prefix(prefix)?.strip_prefix('/')?;
    let (platform, username) = rest.split_once('/')?;
    if username.contains('/') {
        return None;
    }
    Some(LookupRequest {
        platform: percent_decode_str(platform).decode_utf8_lossy().into_owned(),
        username: percent_decode_str(username).decode_utf8_lossy().into_owned(),
    })
}
