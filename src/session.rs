use crate::{
    auth::AuthError,
    identity::IdentityProvider,
    models::{Credentials, Identity},
};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// SessionStore
///
/// The single source of truth for who is logged in. One store exists per client
/// session; it is constructed explicitly and handed to whatever needs it (the route
/// guard, the handlers, tests), never reached through a global.
///
/// The lock protects two fields and is only ever held for a plain read or write,
/// never across the identity provider await.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<SessionInner>,
}

#[derive(Debug, Default)]
struct SessionInner {
    current: Option<Identity>,
    login_in_flight: bool,
}

/// SessionState
pub type SessionState = Arc<SessionStore>;

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// login
    ///
    /// Authenticates `credentials` with the provider and, on success, replaces the
    /// current identity.
    ///
    /// 1. Claims the in-flight flag. A second submission while the first is pending
    ///    fails with `LoginInFlight` without reaching the provider.
    /// 2. Awaits the provider with the lock released.
    /// 3. Stores the new identity, or leaves the previous state untouched on failure.
    pub async fn login(
        &self,
        provider: &dyn IdentityProvider,
        credentials: &Credentials,
    ) -> Result<Identity, AuthError> {
        let _in_flight = self.begin_login()?;

        let user = match provider
            .authenticate(&credentials.email, &credentials.password)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = %e, "login rejected");
                return Err(e);
            }
        };

        let identity = Identity {
            id: user.id,
            display_name: user.name,
            role: user.role,
            avatar_url: user.avatar_url,
            logged_in_at: Utc::now(),
        };

        self.lock().current = Some(identity.clone());
        tracing::info!(user_id = %identity.id, role = %identity.role, "login succeeded");

        Ok(identity)
    }

    /// logout
    ///
    /// Clears the current identity. Calling it while logged out is a no-op.
    pub fn logout(&self) {
        if let Some(previous) = self.lock().current.take() {
            tracing::info!(user_id = %previous.id, role = %previous.role, "logged out");
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    /// True while a login call is waiting on the identity provider.
    pub fn is_login_in_flight(&self) -> bool {
        self.lock().login_in_flight
    }

    fn begin_login(&self) -> Result<InFlightGuard<'_>, AuthError> {
        let mut inner = self.lock();
        if inner.login_in_flight {
            tracing::warn!("duplicate login submission ignored");
            return Err(AuthError::LoginInFlight);
        }
        inner.login_in_flight = true;
        Ok(InFlightGuard { store: self })
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag when the login attempt ends, including when the
/// login future is dropped before completing.
struct InFlightGuard<'a> {
    store: &'a SessionStore,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.store.lock().login_in_flight = false;
    }
}
