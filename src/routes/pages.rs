use crate::{AppState, guard::route_guard, handlers};
use axum::{Router, middleware, routing::get};

/// Page Router Module
///
/// Every path not claimed by the public or session routers is treated as a
/// navigation attempt. The whole router sits behind `route_guard`, so the page
/// handler never runs for an unauthenticated or unauthorized request, and paths
/// that no route rule covers are denied rather than rendered.
///
/// Only `GET` (and `HEAD`) count as navigation; other methods answer 405 once the
/// guard has let them through.
///
/// The router is finished with its state here because it is mounted as the
/// fallback service of the main router.
pub fn page_routes(state: AppState) -> Router {
    Router::new()
        .fallback(get(handlers::render_page))
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .with_state(state)
}
