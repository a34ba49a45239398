//! Transient notification state.
//!
//! DESIGN
//! ======
//! [`ToastSurface`] is a plain clock-driven model: callers pass `now` in
//! milliseconds and the host component ticks it from a timer. Each toast runs
//! its own visible -> fading -> removed timeline; nothing is queued or merged.
//! [`Toaster`] wraps the model in a signal for Leptos context.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use leptos::prelude::*;

/// Visible time when the caller does not choose one.
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

/// Length of the fade-out transition after the timeout.
pub const FADE_MS: u64 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
    Warn,
}

impl Severity {
    pub fn class(self) -> &'static str {
        match self {
            Self::Info => "toast--info",
            Self::Success => "toast--success",
            Self::Error => "toast--error",
            Self::Warn => "toast--warn",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub phase: ToastPhase,
    shown_at: u64,
    timeout_ms: u64,
}

impl Toast {
    fn fade_at(&self) -> u64 {
        self.shown_at.saturating_add(self.timeout_ms)
    }

    fn remove_at(&self) -> u64 {
        self.fade_at().saturating_add(FADE_MS)
    }
}

/// All toasts currently on screen, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastSurface {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast shown from `now` for `timeout_ms`.
    pub fn show_at(&mut self, now: u64, message: impl Into<String>, severity: Severity, timeout_ms: u64) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.toasts.push(Toast {
            id,
            message: message.into(),
            severity,
            phase: ToastPhase::Visible,
            shown_at: now,
            timeout_ms,
        });
        id
    }

    /// Advance every toast to `now`. Returns whether anything changed.
    pub fn tick(&mut self, now: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| now < t.remove_at());
        let mut changed = before != self.toasts.len();
        for toast in &mut self.toasts {
            if toast.phase == ToastPhase::Visible && now >= toast.fade_at() {
                toast.phase = ToastPhase::Fading;
                changed = true;
            }
        }
        changed
    }

    /// Drop a toast immediately (close button).
    pub fn dismiss(&mut self, id: ToastId) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Milliseconds since the epoch from the browser clock, or the system clock
/// natively.
pub fn now_ms() -> u64 {
    #[cfg(feature = "csr")]
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let now = js_sys::Date::now() as u64;
        now
    }
    #[cfg(not(feature = "csr"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Context handle for the single toast surface.
#[derive(Clone, Copy)]
pub struct Toaster {
    surface: RwSignal<ToastSurface>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            surface: RwSignal::new(ToastSurface::new()),
        }
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) -> ToastId {
        self.show_for(message, severity, DEFAULT_TIMEOUT_MS)
    }

    pub fn show_for(&self, message: impl Into<String>, severity: Severity, timeout_ms: u64) -> ToastId {
        let message = message.into();
        log::debug!("toast ({severity:?}): {message}");
        let now = now_ms();
        self.surface
            .try_update(|s| s.show_at(now, message, severity, timeout_ms))
            .unwrap_or(ToastId(0))
    }

    pub fn tick(&self) {
        let now = now_ms();
        let changed = self
            .surface
            .try_update_untracked(|s| s.tick(now))
            .unwrap_or(false);
        if changed {
            self.surface.notify();
        }
    }

    pub fn dismiss(&self, id: ToastId) {
        self.surface.update(|s| s.dismiss(id));
    }

    pub fn surface(&self) -> RwSignal<ToastSurface> {
        self.surface
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}
