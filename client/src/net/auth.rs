//! Cached session status.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server tells the client whether a session cookie is live and, if so,
//! which CSRF token goes with it. Every request path reads this cache; only
//! [`AuthCache::refresh`] writes it.
//!
//! DESIGN
//! ======
//! The cache is an explicit handle injected into the dispatcher rather than
//! module state, so each test and each CLI run gets its own. Clones share the
//! same slot. The lock is only taken to copy or replace the whole value and
//! is never held across an `.await`. An optional listener sees every change,
//! which is how the UI keeps its own session signal in step.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::config::ClientConfig;
use super::transport::{HttpRequest, Headers, Method, Transport, join_url};

/// Path of the server's auth-status endpoint.
pub const AUTH_STATUS_PATH: &str = "/auth/status";

/// Session status as reported by `GET /auth/status`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl AuthState {
    /// CSRF token, only while authenticated.
    pub fn session_token(&self) -> Option<&str> {
        if self.authenticated {
            self.csrf_token.as_deref().filter(|t| !t.is_empty())
        } else {
            None
        }
    }
}

type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

/// Shared, replace-only holder for [`AuthState`].
#[derive(Clone, Default)]
pub struct AuthCache {
    state: Arc<Mutex<AuthState>>,
    listener: Option<Listener>,
}

impl fmt::Debug for AuthCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCache")
            .field("state", &*self.lock())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl AuthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that calls `listener` with the new state whenever it changes.
    /// The lock is released before the call.
    pub fn with_listener(listener: impl Fn(&AuthState) + Send + Sync + 'static) -> Self {
        Self {
            state: Arc::default(),
            listener: Some(Arc::new(listener)),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AuthState {
        self.lock().clone()
    }

    /// Replace all fields at once.
    pub fn replace(&self, next: AuthState) {
        {
            let mut current = self.lock();
            if *current == next {
                return;
            }
            current.clone_from(&next);
        }
        if let Some(listener) = &self.listener {
            listener(&next);
        }
    }

    /// Reset to the signed-out state (used after an explicit logout).
    pub fn clear(&self) {
        self.replace(AuthState::default());
    }

    /// Re-read the session status from the server.
    ///
    /// On success the whole state is replaced. Transport errors, non-2xx
    /// responses and unreadable bodies leave the previous state in place;
    /// nothing is reported to the caller.
    pub async fn refresh<T: Transport>(&self, transport: &T, config: &ClientConfig) {
        let request = HttpRequest {
            method: Method::Get,
            url: join_url(&config.base_url, AUTH_STATUS_PATH),
            headers: Headers::new(),
            body: None,
        };
        let response = match transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("auth refresh failed: {e}");
                return;
            }
        };
        if !response.ok() {
            log::debug!("auth refresh returned status {}", response.status);
            return;
        }
        match response.json::<AuthState>() {
            Ok(next) => {
                log::debug!(
                    "auth refreshed: authenticated={} admin={} token={}",
                    next.authenticated,
                    next.is_admin,
                    next.csrf_token.is_some()
                );
                self.replace(next);
            }
            Err(e) => log::debug!("auth refresh body unreadable: {e}"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
