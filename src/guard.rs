use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    models::{GuardOutcome, Identity},
    registry::{RouteRegistry, area_root, default_path_for, normalize_path},
};

/// Entry point of the login view.
pub const LOGIN_PATH: &str = "/login";
/// Fixed target for authenticated users who request a path their role may not enter.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// GuardState
///
/// The three states a navigation attempt can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    AuthenticatedAllowed,
    AuthenticatedDenied,
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardState::Unauthenticated => "unauthenticated",
            GuardState::AuthenticatedAllowed => "authenticated_allowed",
            GuardState::AuthenticatedDenied => "authenticated_denied",
        }
    }
}

/// GuardDecision
///
/// What the router must do with one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested destination.
    Allow,
    /// Nobody is logged in. The requested path is discarded.
    RedirectToLogin,
    /// The request named an area index (or the root); go to the role's dashboard.
    RedirectToDashboard(&'static str),
    /// The role may not enter the path. Never retried automatically.
    RedirectToUnauthorized,
}

impl GuardDecision {
    pub fn state(&self) -> GuardState {
        match self {
            GuardDecision::RedirectToLogin => GuardState::Unauthenticated,
            GuardDecision::Allow | GuardDecision::RedirectToDashboard(_) => {
                GuardState::AuthenticatedAllowed
            }
            GuardDecision::RedirectToUnauthorized => GuardState::AuthenticatedDenied,
        }
    }

    pub fn location(&self) -> Option<&'static str> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin => Some(LOGIN_PATH),
            GuardDecision::RedirectToDashboard(path) => Some(*path),
            GuardDecision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }

    pub fn outcome(&self) -> GuardOutcome {
        GuardOutcome {
            state: self.state().as_str().to_string(),
            location: self.location().map(str::to_string),
        }
    }
}

/// RouteGuard
///
/// Decides every navigation attempt from the current identity and the requested
/// path alone. It keeps no state between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<'a> {
    registry: &'a RouteRegistry,
}

impl<'a> RouteGuard<'a> {
    pub fn new(registry: &'a RouteRegistry) -> Self {
        Self { registry }
    }

    /// evaluate
    ///
    /// 1. No identity: redirect to login.
    /// 2. The root or the index of the role's own area: redirect to its dashboard.
    /// 3. The registry allows the path for the role: allow.
    /// 4. Anything else: redirect to the unauthorized view.
    pub fn evaluate(&self, identity: Option<&Identity>, path: &str) -> GuardDecision {
        let Some(identity) = identity else {
            return GuardDecision::RedirectToLogin;
        };

        // Paths with dot or empty segments are never resolved, only denied.
        let Some(path) = normalize_path(path) else {
            return GuardDecision::RedirectToUnauthorized;
        };
        if path == "/" || path == area_root(identity.role) {
            return GuardDecision::RedirectToDashboard(default_path_for(identity.role));
        }

        if self.registry.is_allowed(identity.role, path) {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectToUnauthorized
        }
    }
}

/// route_guard
///
/// Middleware placed in front of every page view. The page handler only runs for
/// `Allow`; every other decision becomes a `303 See Other` redirect.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let identity = state.session.current_identity();
    let decision = RouteGuard::new(&state.registry).evaluate(identity.as_ref(), &path);

    tracing::debug!(path = %path, state = decision.state().as_str(), "route guard decision");

    match decision {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToUnauthorized => {
            if let Some(identity) = identity {
                tracing::warn!(path = %path, role = %identity.role, "navigation denied");
            }
            Redirect::to(UNAUTHORIZED_PATH).into_response()
        }
        GuardDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        GuardDecision::RedirectToDashboard(dashboard) => Redirect::to(dashboard).into_response(),
    }
}
