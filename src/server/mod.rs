//! HTTP server surface: axum handlers and router assembly

pub mod handlers;
pub mod router;

pub use handlers::AppState;
pub use router::build_router;
