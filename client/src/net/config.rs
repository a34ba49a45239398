//! Client connection settings.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Development-only API key the server falls back to when `LPS2_API_KEY`
/// is unset. Any real deployment overrides it.
pub const DEFAULT_API_KEY: &str = "secret12345";

/// Where to send requests and which static credential to present when no
/// session is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://127.0.0.1:5000`. Empty means same-origin.
    pub base_url: String,
    /// API key override. `None` or blank uses [`DEFAULT_API_KEY`].
    pub api_key: Option<String>,
}

impl ClientConfig {
    /// Same-origin config for the browser build.
    pub fn same_origin() -> Self {
        Self::default()
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// The key to present as a bearer credential.
    pub fn effective_api_key(&self) -> &str {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => DEFAULT_API_KEY,
        }
    }

    pub fn uses_default_api_key(&self) -> bool {
        self.effective_api_key() == DEFAULT_API_KEY
    }
}
