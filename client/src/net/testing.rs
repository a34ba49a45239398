//! In-memory transport and alert doubles shared by the networking tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use super::auth::{AUTH_STATUS_PATH, AuthState};
use super::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::util::alert::Alert;

/// Records every request; answers `/auth/status` from a settable state and
/// everything else from a queue (default `200 {}`).
#[derive(Default)]
pub(crate) struct MockTransport {
    requests: RefCell<Vec<HttpRequest>>,
    status: RefCell<Option<AuthState>>,
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Transport whose status endpoint reports `state`.
    pub(crate) fn with_status(state: AuthState) -> Self {
        let transport = Self::new();
        transport.set_status(Some(state));
        transport
    }

    /// `None` makes the status endpoint answer 500.
    pub(crate) fn set_status(&self, state: Option<AuthState>) {
        *self.status.borrow_mut() = state;
    }

    pub(crate) fn push_response(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    pub(crate) fn push_error(&self, error: TransportError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// URLs in dispatch order.
    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url.ends_with(AUTH_STATUS_PATH))
            .count()
    }

    /// Most recent request that was not a status refresh.
    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .rev()
            .find(|r| !r.url.ends_with(AUTH_STATUS_PATH))
            .cloned()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let is_status = request.url.ends_with(AUTH_STATUS_PATH);
        self.requests.borrow_mut().push(request);
        if is_status {
            return Ok(match self.status.borrow().as_ref() {
                Some(state) => HttpResponse::new(200, serde_json::to_vec(state).unwrap_or_default()),
                None => HttpResponse::new(500, "status unavailable"),
            });
        }
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }
}

/// Counts alerts and keeps their text.
#[derive(Default)]
pub(crate) struct RecordingAlert {
    count: Cell<usize>,
    messages: RefCell<Vec<String>>,
}

impl RecordingAlert {
    pub(crate) fn count(&self) -> usize {
        self.count.get()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Alert for RecordingAlert {
    fn alert(&self, message: &str) {
        self.count.set(self.count.get() + 1);
        self.messages.borrow_mut().push(message.to_owned());
    }
}

/// Session state with the given CSRF token.
pub(crate) fn session(token: &str) -> AuthState {
    AuthState {
        authenticated: true,
        csrf_token: Some(token.to_owned()),
        user: Some("admin".to_owned()),
        is_admin: true,
    }
}
