//! Authenticated request dispatcher.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every call the UI or CLI makes goes through [`Dispatcher::fetch`]. The
//! server accepts two kinds of callers: sessionless clients presenting the
//! static API key, and logged-in browsers presenting a session cookie plus a
//! CSRF token on anything that mutates state.
//!
//! PROTOCOL
//! ========
//! 1. Mutating calls refresh the auth cache first, so the token used is at
//!    most one round-trip old.
//! 2. Headers: bearer key when signed out; CSRF header (and JSON body field)
//!    when signed in and mutating; JSON content type for POST/PUT/DELETE.
//! 3. Transport errors propagate; nothing is retried here.
//! 4. CSRF rejections refresh the cache. `csrf_invalid` also alerts the user
//!    so they re-trigger the action themselves, since the first attempt may
//!    have partially applied.
//! 5. HTTP-level failures come back as responses, never as errors.

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod dispatcher_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::auth::{AuthCache, AuthState};
use super::body::RequestBody;
use super::config::ClientConfig;
use super::error::{CsrfFailure, ErrorBody};
use super::transport::{Headers, HttpRequest, HttpResponse, Method, Transport, TransportError, join_url};
use crate::util::alert::Alert;

pub const AUTHORIZATION: &str = "Authorization";
pub const X_API_KEY: &str = "X-API-Key";
pub const X_CSRF_TOKEN: &str = "X-CSRF-Token";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Text of the blocking notice raised on `csrf_invalid`.
pub const CSRF_INVALID_NOTICE: &str =
    "Your session security token was out of date and has been refreshed. Please retry the action.";

/// Caller-supplied request shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Headers,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Option<RequestBody>) -> Self {
        Self {
            method: Method::Post,
            headers: Headers::new(),
            body,
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }
}

/// Applies the credential and CSRF rules to outbound requests.
#[derive(Clone, Debug)]
pub struct Dispatcher<T, A> {
    transport: T,
    alert: A,
    config: ClientConfig,
    auth: AuthCache,
    warned_default_key: Arc<AtomicBool>,
}

impl<T: Transport, A: Alert> Dispatcher<T, A> {
    pub fn new(transport: T, alert: A, config: ClientConfig) -> Self {
        Self::with_cache(transport, alert, config, AuthCache::new())
    }

    /// Build around an existing cache (e.g. one the UI also observes).
    pub fn with_cache(transport: T, alert: A, config: ClientConfig, auth: AuthCache) -> Self {
        Self {
            transport,
            alert,
            config,
            auth,
            warned_default_key: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn auth(&self) -> &AuthCache {
        &self.auth
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Re-read the session status from the server.
    pub async fn refresh(&self) {
        self.auth.refresh(&self.transport, &self.config).await;
    }

    /// Send a request under the protocol described in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was received.
    pub async fn fetch(
        &self,
        path: &str,
        options: RequestOptions,
        mutating: bool,
    ) -> Result<HttpResponse, TransportError> {
        if mutating {
            self.refresh().await;
        }

        let state = self.auth.snapshot();
        if !state.authenticated
            && self.config.uses_default_api_key()
            && !self.warned_default_key.swap(true, Ordering::Relaxed)
        {
            log::warn!("using the development default API key; set an API key for real deployments");
        }

        let RequestOptions { method, headers, mut body } = options;
        let headers = prepare_headers(method, headers, body.as_ref(), &state, &self.config, mutating);
        if mutating {
            if let (Some(token), Some(body)) = (state.session_token(), body.as_mut()) {
                if body.attach_csrf(token) {
                    log::debug!("csrf token merged into request body");
                }
            }
        }

        let request = HttpRequest {
            method,
            url: join_url(&self.config.base_url, path),
            headers,
            body,
        };
        log::debug!("{} {} ({} headers)", request.method, request.url, request.headers.len());

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("request to {path} failed: {e}");
                return Err(e);
            }
        };

        if !response.ok() {
            self.recover_csrf(&response).await;
        }
        Ok(response)
    }

    /// Plain GET.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::fetch`].
    pub async fn get(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.fetch(path, RequestOptions::get(), false).await
    }

    /// Mutating POST.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::fetch`].
    pub async fn post(&self, path: &str, body: Option<RequestBody>) -> Result<HttpResponse, TransportError> {
        self.fetch(path, RequestOptions::post(body), true).await
    }

    async fn recover_csrf(&self, response: &HttpResponse) {
        let Some(failure) = ErrorBody::from_response(response).and_then(|b| b.csrf_failure()) else {
            return;
        };
        match failure {
            CsrfFailure::Missing => {
                log::warn!("server reported a missing CSRF token; refreshing session status");
                self.refresh().await;
            }
            CsrfFailure::Invalid => {
                log::warn!("server rejected the CSRF token; refreshing session status");
                self.refresh().await;
                self.alert.alert(CSRF_INVALID_NOTICE);
            }
        }
    }
}

/// Build the outbound header set for one request.
///
/// Caller-supplied headers are kept; credentials and content type are only
/// added when the caller has not already set them.
pub fn prepare_headers(
    method: Method,
    mut headers: Headers,
    body: Option<&RequestBody>,
    state: &AuthState,
    config: &ClientConfig,
    mutating: bool,
) -> Headers {
    if !state.authenticated {
        if !headers.contains(AUTHORIZATION) && !headers.contains(X_API_KEY) {
            headers.set(AUTHORIZATION, &format!("Bearer {}", config.effective_api_key()));
            log::debug!("no session; attached bearer credential");
        }
    } else if mutating {
        match state.session_token() {
            Some(token) => {
                headers.set(X_CSRF_TOKEN, token);
                log::debug!("session active; attached csrf header");
            }
            None => log::debug!("session active but no csrf token cached"),
        }
    }

    let is_form = body.is_some_and(RequestBody::is_form);
    if method.defaults_to_json() && !is_form && !headers.contains(CONTENT_TYPE) {
        headers.set(CONTENT_TYPE, JSON_CONTENT_TYPE);
    }
    headers
}
