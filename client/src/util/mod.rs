//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, alerts, document
//! classes) behind small traits so the page logic stays testable natively.

pub mod alert;
pub mod nav;
pub mod storage;
pub mod theme;
pub mod validation;
