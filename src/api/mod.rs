//! HTTP surface.
//!
//! Account endpoints are anonymous. Everything else sits behind the bearer
//! token middleware, and each handler checks the caller's roles itself
//! before touching a service.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
