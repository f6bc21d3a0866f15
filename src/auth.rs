use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{models::Identity, session::SessionState};

/// AuthError
///
/// Authentication failures reported back to the login form. None of them change
/// the session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Recoverable by resubmitting the form.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// A previous submission has not resolved yet.
    #[error("a login attempt is already in progress")]
    LoginInFlight,
    /// The identity provider itself failed (unreachable, misconfigured).
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::LoginInFlight => StatusCode::CONFLICT,
            AuthError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// AuthUser
///
/// The identity of the current session, resolved for handlers that need one.
/// Handlers take it as an argument; if nobody is logged in the extractor rejects
/// the request with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionState::from_ref(state);

        session
            .current_identity()
            .map(AuthUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
