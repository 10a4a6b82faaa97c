//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → lookup handler → gateway (rate-limited provider call)
//!       or pages.rs (form, widget, assets, redirects)
//!     → response.rs (failures become the sentinel payload)
//!     → Send to client
//! ```

pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, LOOKUP_ROUTE};
