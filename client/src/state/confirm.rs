//! Single confirmation dialog shared by the whole app.
//!
//! DESIGN
//! ======
//! [`ConfirmModal`] holds at most one pending request and the oneshot sender
//! that answers it. Resolving takes the sender out, so a request can only be
//! answered once. Opening a new request while one is pending answers the old
//! one with `false` and reuses the same dialog.

#[cfg(test)]
#[path = "confirm_test.rs"]
mod confirm_test;

use futures::channel::oneshot;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub confirm_label: String,
    /// Styles the confirm button as dangerous.
    pub destructive: bool,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            confirm_label: "Confirm".to_owned(),
            destructive: false,
        }
    }
}

impl ConfirmOptions {
    pub fn destructive(label: impl Into<String>) -> Self {
        Self {
            confirm_label: label.into(),
            destructive: true,
        }
    }
}

/// What the dialog shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub message: String,
    pub options: ConfirmOptions,
}

/// Answer to one request. Dropped senders count as `false`.
#[derive(Debug)]
pub struct Confirmation {
    rx: oneshot::Receiver<bool>,
}

impl Confirmation {
    pub async fn wait(self) -> bool {
        self.rx.await.unwrap_or(false)
    }

    /// Already-declined answer, for when no dialog can be shown.
    pub fn declined() -> Self {
        let (_, rx) = oneshot::channel();
        Self { rx }
    }
}

#[derive(Debug)]
struct Pending {
    request: ConfirmRequest,
    responder: oneshot::Sender<bool>,
}

#[derive(Debug, Default)]
pub struct ConfirmModal {
    pending: Option<Pending>,
}

impl ConfirmModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`, replacing any open request.
    pub fn open(&mut self, message: impl Into<String>, options: ConfirmOptions) -> Confirmation {
        self.resolve(false);
        let (responder, rx) = oneshot::channel();
        self.pending = Some(Pending {
            request: ConfirmRequest {
                message: message.into(),
                options,
            },
            responder,
        });
        Confirmation { rx }
    }

    /// Answer the open request and close. Returns false when nothing was open.
    pub fn resolve(&mut self, answer: bool) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        // The caller may have stopped waiting.
        let _ = pending.responder.send(answer);
        true
    }

    /// Enter confirms, Escape cancels. Returns whether the key was handled.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match key {
            "Enter" => self.resolve(true),
            "Escape" => self.resolve(false),
            _ => false,
        }
    }

    pub fn request(&self) -> Option<&ConfirmRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }
}

/// Context handle for the app-wide dialog.
#[derive(Clone, Copy)]
pub struct Confirmer {
    modal: RwSignal<ConfirmModal>,
}

impl Confirmer {
    pub fn new() -> Self {
        Self {
            modal: RwSignal::new(ConfirmModal::new()),
        }
    }

    pub fn confirm(&self, message: impl Into<String>, options: ConfirmOptions) -> Confirmation {
        let message = message.into();
        self.modal
            .try_update(|m| m.open(message, options))
            .unwrap_or_else(Confirmation::declined)
    }

    pub fn resolve(&self, answer: bool) {
        self.modal.update(|m| {
            m.resolve(answer);
        });
    }

    pub fn handle_key(&self, key: &str) -> bool {
        self.modal.try_update(|m| m.handle_key(key)).unwrap_or(false)
    }

    pub fn request(&self) -> Option<ConfirmRequest> {
        self.modal.with(|m| m.request().cloned())
    }
}

impl Default for Confirmer {
    fn default() -> Self {
        Self::new()
    }
}
