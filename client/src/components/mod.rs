//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the shared page chrome (navigation, theme switch, toast
//! stack, confirmation dialog) while reading and writing state from Leptos
//! context providers.

pub mod confirm_modal;
pub mod nav_bar;
pub mod theme_toggle;
pub mod toast_host;
