use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Session Router Module
///
/// Endpoints that read or change state belonging to the logged-in session. Every
/// handler takes `AuthUser`, which rejects with 401 when the session store is empty.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        // GET /auth/me
        .route("/auth/me", get(handlers::get_me))
        // GET /api/navigation?path=...
        // The role's menu with active, has-active-child and open flags.
        .route("/api/navigation", get(handlers::get_navigation))
        // POST /api/navigation/toggle
        // Flips one group in the session's expansion state.
        .route("/api/navigation/toggle", post(handlers::toggle_navigation))
}
