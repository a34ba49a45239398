//! # lps2-client
//!
//! Leptos + WASM front end for the LPS2 private chat server.
//!
//! The crate owns the authenticated-fetch protocol used by every page:
//! API-key injection for sessionless callers, CSRF token injection and
//! refresh for logged-in sessions, and recovery when the server rejects a
//! token. Around it sit the shared UI primitives (toasts, confirmation
//! modal, theme, navigation) and typed helpers for each server endpoint.
//!
//! Everything except the browser transport, storage backend and component
//! mounting compiles natively so the protocol is testable without a browser
//! and reusable from the `lps2` CLI.

#[cfg(feature = "csr")]
pub mod app;
pub mod components;
pub mod net;
pub mod state;
pub mod util;

/// Browser entry point: install logging and mount the application shell.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
