//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! All routes live under `/api/v1`; response bodies carry the
//! `{success: bool, ...}` shape. Routing, CORS and request tracing are the
//! only concerns here; the services own the actual read/write logic.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
