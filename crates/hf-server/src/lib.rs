//! Haiku feed generator HTTP server (Axum).
//!
//! Serves the feed skeleton, generator description, did:web document and a
//! health probe over a read-only view of the post store.

pub mod algos;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
pub use state::AppState;

/// Build the application router with an empty in-memory store.
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::feed_routes())
        .merge(routes::well_known_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests;
