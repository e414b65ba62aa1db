//! HTTP API.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server. Resource routes are nested under `/api/`.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{serve_until_ctrl_c, start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
