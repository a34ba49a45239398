//! Networking modules for the authenticated-fetch protocol.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` abstracts the HTTP engine (gloo-net in the browser, reqwest in
//! the CLI), `auth` caches the session status, `dispatcher` applies the
//! credential/CSRF rules to every request, and `api` exposes typed endpoint
//! helpers on top. `types` defines the wire schema.

pub mod api;
pub mod auth;
pub mod body;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
