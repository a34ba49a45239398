//! Blocking notices for the human operator.
//!
//! Used when silently retrying could resubmit stale data, so the person has
//! to acknowledge before acting again.

/// Shows a message the user must acknowledge.
pub trait Alert {
    fn alert(&self, message: &str);
}

impl<A: Alert + ?Sized> Alert for &A {
    fn alert(&self, message: &str) {
        (**self).alert(message);
    }
}

/// `window.alert` in the browser; a logged warning elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserAlert;

impl Alert for BrowserAlert {
    fn alert(&self, message: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
                return;
            }
        }
        log::warn!("{message}");
    }
}
