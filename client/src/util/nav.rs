//! Top navigation model: which sections exist and which one is active.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use super::storage::KeyValueStore;
use crate::net::auth::AuthState;

/// Storage key remembering the last section the user opened.
pub const NAV_KEY: &str = "lps2_last_nav";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavSection {
    #[default]
    Chat,
    Knowledge,
    Memory,
    Security,
    Admin,
}

impl NavSection {
    pub const ALL: [Self; 5] = [Self::Chat, Self::Knowledge, Self::Memory, Self::Security, Self::Admin];

    pub fn id(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Knowledge => "knowledge",
            Self::Memory => "memory",
            Self::Security => "security",
            Self::Admin => "admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Knowledge => "Knowledge",
            Self::Memory => "Memory",
            Self::Security => "Security",
            Self::Admin => "Admin",
        }
    }

    pub fn href(self) -> &'static str {
        match self {
            Self::Chat => "/",
            Self::Knowledge => "/knowledge",
            Self::Memory => "/memory",
            Self::Security => "/security",
            Self::Admin => "/admin",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn requires_admin(self) -> bool {
        self == Self::Admin
    }

    pub fn visible_to(self, auth: &AuthState) -> bool {
        !self.requires_admin() || auth.is_admin
    }
}

/// Section owning `path`, if any. `/` and `/chat` both mean Chat.
pub fn section_for_path(path: &str) -> Option<NavSection> {
    let first = path.trim_start_matches('/').split(['/', '?', '#']).next().unwrap_or("");
    match first {
        "" | "chat" => Some(NavSection::Chat),
        other => NavSection::from_id(other),
    }
}

/// One rendered nav entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub section: NavSection,
    pub active: bool,
}

/// Entries visible to `auth`, with `active` marked.
pub fn build_nav(auth: &AuthState, active: NavSection) -> Vec<NavItem> {
    NavSection::ALL
        .into_iter()
        .filter(|s| s.visible_to(auth))
        .map(|section| NavItem {
            section,
            active: section == active,
        })
        .collect()
}

/// Best-effort memory of the last opened section.
#[derive(Clone, Debug, Default)]
pub struct NavMemory<S> {
    store: S,
}

impl<S: KeyValueStore> NavMemory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn remember(&self, section: NavSection) {
        if let Err(e) = self.store.set(NAV_KEY, section.id()) {
            log::debug!("nav choice not persisted: {e}");
        }
    }

    pub fn recall(&self) -> Option<NavSection> {
        self.store
            .get(NAV_KEY)
            .ok()
            .flatten()
            .and_then(|id| NavSection::from_id(&id))
    }

    /// Active section: from the path, else remembered, else Chat. Sections
    /// hidden from `auth` never win.
    pub fn resolve(&self, path: Option<&str>, auth: &AuthState) -> NavSection {
        path.and_then(section_for_path)
            .or_else(|| self.recall())
            .filter(|s| s.visible_to(auth))
            .unwrap_or_default()
    }
}
