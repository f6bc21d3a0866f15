use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access-control core.
pub mod expansion;
pub mod guard;
pub mod navigation;
pub mod registry;
pub mod session;

// Identity, configuration and the HTTP shell around the core.
pub mod auth;
pub mod config;
pub mod handlers;
pub mod identity;
pub mod models;

// Module for routing segregation (Public, Session, Guarded Pages).
pub mod routes;
use routes::{pages, public, session as session_routes};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use expansion::{ExpansionHandle, ExpansionState};
pub use guard::{GuardDecision, RouteGuard};
pub use identity::{IdentityProvider, IdentityProviderState, InMemoryIdentityProvider};
pub use registry::{RegistryState, RouteRegistry};
pub use session::{SessionState, SessionStore};

/// ApiDoc
///
/// OpenAPI description of the shell, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout, handlers::get_me, handlers::login_view,
        handlers::unauthorized_view, handlers::check_guard, handlers::get_navigation,
        handlers::toggle_navigation
    ),
    components(
        schemas(
            models::Role, models::Identity, models::Credentials, models::RouteRule,
            models::GuardOutcome, models::NavEntryView, models::NavGroupView,
            models::ToggleRequest, models::ExpansionSnapshot, models::PageView,
            models::StatusView,
        )
    ),
    tags(
        (name = "lms-portal", description = "LMS portal session, route guard and navigation API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything one client session needs, constructed once and injected into the
/// router. Tests build their own `AppState` with fakes instead of touching globals.
#[derive(Clone)]
pub struct AppState {
    /// Who is logged in.
    pub session: SessionState,
    /// Checks credentials on login.
    pub identity: IdentityProviderState,
    /// The role to route authorization table.
    pub registry: RegistryState,
    /// Open navigation groups of the current view session.
    pub expansion: ExpansionHandle,
    pub config: AppConfig,
}

impl AppState {
    /// new
    ///
    /// A fresh session (nobody logged in, every group collapsed) over the given
    /// identity provider and route registry.
    pub fn new(
        identity: IdentityProviderState,
        registry: RouteRegistry,
        config: AppConfig,
    ) -> Self {
        Self {
            session: Arc::new(SessionStore::new()),
            identity,
            registry: Arc::new(registry),
            expansion: Arc::new(Mutex::new(ExpansionState::new())),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.session.clone()
    }
}

impl FromRef<AppState> for RegistryState {
    fn from_ref(app_state: &AppState) -> RegistryState {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the shell: documentation, public and session routes, and the guarded
/// page router as the fallback for every other path.
pub fn create_router(state: AppState) -> Router {
    // The renderer may be served from another origin during development.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(session_routes::session_routes())
        // Navigation attempts: everything else goes through the route guard.
        .fallback_service(pages::page_routes(state.clone()))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one HTTP request, carrying the method, URI and the `x-request-id` so
/// every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
