use crate::{AppState, guard, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. The login and unauthorized views must
/// stay here: they are the redirect targets of the route guard, and guarding them
/// would loop.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for monitoring.
        .route("/health", get(|| async { "ok" }))
        // GET /login
        // Login form descriptor; reports whether a submission is still in flight.
        .route(guard::LOGIN_PATH, get(handlers::login_view))
        // GET /unauthorized
        // Fixed landing view for denied navigations.
        .route(guard::UNAUTHORIZED_PATH, get(handlers::unauthorized_view))
        // POST /auth/login
        // Authenticates against the identity provider. Duplicate submissions answer 409.
        .route("/auth/login", post(handlers::login))
        // POST /auth/logout
        // Idempotent, so it does not require a session.
        .route("/auth/logout", post(handlers::logout))
        // GET /api/guard?path=...
        // Lets a client-side router ask the guard before it mounts a view.
        .route("/api/guard", get(handlers::check_guard))
}
