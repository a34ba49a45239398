//! Light/dark theme persistence and toggle.
//!
//! Reads the saved choice from client storage and toggles a `dark` class on
//! the document element. Toggling writes the new choice back. Any storage
//! failure reads as the default light theme.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::str::FromStr;

use super::storage::KeyValueStore;

/// Storage key holding `"light"` or `"dark"`.
pub const THEME_KEY: &str = "lps2Theme";

/// Class toggled on the document element while dark.
pub const DARK_CLASS: &str = "dark";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label of the button that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to dark",
            Self::Dark => "Switch to light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// Where a theme becomes visible.
pub trait ThemeSurface {
    fn apply(&self, theme: Theme);
}

/// The document element's class list. No-op outside the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTheme;

impl ThemeSurface for DocumentTheme {
    fn apply(&self, theme: Theme) {
        #[cfg(feature = "csr")]
        {
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element())
            {
                let _ = el
                    .class_list()
                    .toggle_with_force(DARK_CLASS, theme == Theme::Dark);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = theme;
        }
    }
}

/// Read the saved theme; missing, unreadable or unknown values mean light.
pub fn read_preference(store: &impl KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(e) => {
            log::debug!("theme preference unavailable: {e}");
            Theme::default()
        }
    }
}

/// Owns the current theme for one storage backend and one surface.
#[derive(Clone, Debug)]
pub struct ThemeController<S, D> {
    store: S,
    surface: D,
    current: Theme,
}

impl<S: KeyValueStore, D: ThemeSurface> ThemeController<S, D> {
    pub fn new(store: S, surface: D) -> Self {
        Self {
            store,
            surface,
            current: Theme::default(),
        }
    }

    /// Re-apply the persisted choice.
    pub fn init(&mut self) -> Theme {
        self.current = read_preference(&self.store);
        self.surface.apply(self.current);
        self.current
    }

    /// Apply and persist `theme`.
    pub fn set_theme(&mut self, theme: Theme) {
        self.current = theme;
        self.surface.apply(theme);
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            log::debug!("theme not persisted: {e}");
        }
    }

    pub fn toggle(&mut self) -> Theme {
        let next = self.current.flipped();
        self.set_theme(next);
        next
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn label(&self) -> &'static str {
        self.current.toggle_label()
    }
}
