use crate::{
    AppState,
    auth::{AuthError, AuthUser},
    expansion::ExpansionState,
    guard::RouteGuard,
    models::{
        Credentials, ExpansionSnapshot, GuardOutcome, Identity, NavGroupView, PageView,
        StatusView, ToggleRequest,
    },
    navigation,
    registry::{default_path_for, normalize_path},
};
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, Uri},
};
use serde::Deserialize;
use std::sync::{MutexGuard, PoisonError};

// --- Query Structs ---

/// PathQuery
///
/// The path a client-side router is about to show, for the guard and navigation endpoints.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PathQuery {
    /// Application path, e.g. `/teacher/gradebook`.
    pub path: Option<String>,
}

fn expansion(state: &AppState) -> MutexGuard<'_, ExpansionState> {
    state.expansion.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- Session Handlers ---

/// login
///
/// [Public Route] Authenticates the submitted credentials and starts a new session.
/// A fresh session starts with every navigation group collapsed.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = Identity),
        (status = 401, description = "Invalid credentials"),
        (status = 409, description = "Login already in flight"),
        (status = 502, description = "Identity provider failure")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Identity>, AuthError> {
    let identity = state
        .session
        .login(state.identity.as_ref(), &credentials)
        .await?;

    expansion(&state).clear();

    Ok(Json(identity))
}

/// logout
///
/// [Public Route] Ends the session and tears down its expansion state. Idempotent:
/// logging out twice answers 204 both times.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out"))
)]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout();
    expansion(&state).clear();
    StatusCode::NO_CONTENT
}

/// get_me
///
/// [Session Route] The identity of the current session.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current identity", body = Identity),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_me(AuthUser(identity): AuthUser) -> Json<Identity> {
    Json(identity)
}

// --- Unguarded Views ---

/// login_view
///
/// [Public Route] Descriptor for the login form. The submit button is disabled
/// while a previous submission is still waiting on the identity provider.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login view", body = StatusView))
)]
pub async fn login_view(State(state): State<AppState>) -> Json<StatusView> {
    let home = state
        .session
        .current_identity()
        .map(|identity| default_path_for(identity.role).to_string());

    Json(StatusView {
        view: "login".to_string(),
        message: "Masuk dengan email dan kata sandi Anda.".to_string(),
        submit_disabled: state.session.is_login_in_flight(),
        home,
    })
}

/// unauthorized_view
///
/// [Public Route] Descriptor for the page shown after a denied navigation. It links
/// back to the caller's own dashboard when someone is logged in.
#[utoipa::path(
    get,
    path = "/unauthorized",
    responses((status = 200, description = "Unauthorized view", body = StatusView))
)]
pub async fn unauthorized_view(State(state): State<AppState>) -> Json<StatusView> {
    let home = state
        .session
        .current_identity()
        .map(|identity| default_path_for(identity.role).to_string());

    Json(StatusView {
        view: "unauthorized".to_string(),
        message: "Anda tidak memiliki akses ke halaman ini.".to_string(),
        submit_disabled: false,
        home,
    })
}

/// check_guard
///
/// [Public Route] Runs the route guard for `path` without navigating, so a client-side
/// router can decide before it mounts a view.
#[utoipa::path(
    get,
    path = "/api/guard",
    params(PathQuery),
    responses((status = 200, description = "Guard decision", body = GuardOutcome))
)]
pub async fn check_guard(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Json<GuardOutcome> {
    let path = query.path.unwrap_or_else(|| "/".to_string());
    let identity = state.session.current_identity();
    let decision = RouteGuard::new(&state.registry).evaluate(identity.as_ref(), &path);

    Json(decision.outcome())
}

// --- Navigation Handlers ---

/// get_navigation
///
/// [Session Route] The menu for the session's role with active and open flags for
/// `path`. Without a path, the role's dashboard is treated as current.
#[utoipa::path(
    get,
    path = "/api/navigation",
    params(PathQuery),
    responses(
        (status = 200, description = "Navigation tree", body = [NavGroupView]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_navigation(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Json<Vec<NavGroupView>> {
    let path = query
        .path
        .unwrap_or_else(|| default_path_for(identity.role).to_string());

    let tree = navigation::render(identity.role, &path, &expansion(&state));
    Json(tree)
}

/// toggle_navigation
///
/// [Session Route] Opens or closes one navigation group. Ids that match no entry
/// are toggled like any other and never produce an error.
#[utoipa::path(
    post,
    path = "/api/navigation/toggle",
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "Expansion state after the toggle", body = ExpansionSnapshot),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn toggle_navigation(
    AuthUser(_identity): AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Json<ExpansionSnapshot> {
    let mut expansion = expansion(&state);
    let open = expansion.toggle(&payload.id);

    Json(ExpansionSnapshot {
        id: payload.id,
        open,
        open_ids: expansion.open_ids(),
    })
}

// --- Guarded Pages ---

/// render_page
///
/// [Guarded Route] Produces the view descriptor for a page. Only reached after the
/// `route_guard` middleware has allowed the navigation.
pub async fn render_page(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    uri: Uri,
) -> Json<PageView> {
    // The guard has already rejected non-canonical paths.
    let path = normalize_path(uri.path()).unwrap_or(uri.path()).to_string();
    let title = navigation::find_entry(identity.role, &path).map(|entry| entry.name.clone());
    let navigation = navigation::render(identity.role, &path, &expansion(&state));

    Json(PageView {
        path,
        title,
        role: identity.role,
        navigation,
    })
}
