//! Router assembly.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{handlers, AppState};

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/users", post(handlers::create_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
