//! Review API.
//!
//! Exposes the review session as HTTP endpoints for the renderer.
//! Routes are nested under `/api/` and logged by the access middleware.
//!
//! The router is composable: `review_api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::review_api_router;
pub use server::{start_review_api_server, ReviewApiServer, ReviewApiSession};
pub use types::ApiContext;
