//! Application-wide UI state shared through Leptos context.
//!
//! DESIGN
//! ======
//! Each module keeps a plain model (testable without a reactive runtime) and a
//! small `Copy` handle wrapping it in a signal for components.

pub mod confirm;
pub mod toast;
