use std::cell::RefCell;

use super::*;
use crate::util::storage::{MemoryStore, StorageError};

/// Remembers every theme applied, like a class list would.
#[derive(Default)]
struct RecordingSurface {
    applied: RefCell<Vec<Theme>>,
}

impl RecordingSurface {
    fn dark_class(&self) -> bool {
        self.applied.borrow().last() == Some(&Theme::Dark)
    }
}

impl ThemeSurface for &RecordingSurface {
    fn apply(&self, theme: Theme) {
        self.applied.borrow_mut().push(theme);
    }
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Rejected { key: key.to_owned() })
    }
}

#[test]
fn dark_choice_survives_a_fresh_init() {
    let store = MemoryStore::new();
    let first = RecordingSurface::default();
    let mut theme = ThemeController::new(store.clone(), &first);
    theme.set_theme(Theme::Dark);
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

    let reloaded = RecordingSurface::default();
    let mut theme = ThemeController::new(store, &reloaded);
    assert_eq!(theme.init(), Theme::Dark);
    assert!(reloaded.dark_class());
    assert_eq!(theme.label(), "Switch to light");
}

#[test]
fn init_defaults_to_light() {
    let surface = RecordingSurface::default();
    let mut theme = ThemeController::new(MemoryStore::new(), &surface);
    assert_eq!(theme.init(), Theme::Light);
    assert!(!surface.dark_class());
    assert_eq!(theme.label(), "Switch to dark");
}

#[test]
fn unknown_stored_value_reads_as_light() {
    let store = MemoryStore::new();
    store.set(THEME_KEY, "sepia").unwrap();
    assert_eq!(read_preference(&store), Theme::Light);
}

#[test]
fn storage_failures_are_swallowed() {
    let surface = RecordingSurface::default();
    let mut theme = ThemeController::new(BrokenStore, &surface);
    assert_eq!(theme.init(), Theme::Light);
    assert_eq!(theme.toggle(), Theme::Dark);
    assert_eq!(theme.current(), Theme::Dark);
    assert!(surface.dark_class());
}

#[test]
fn toggle_flips_and_persists() {
    let store = MemoryStore::new();
    let surface = RecordingSurface::default();
    let mut theme = ThemeController::new(store.clone(), &surface);
    theme.init();
    assert_eq!(theme.toggle(), Theme::Dark);
    assert_eq!(theme.toggle(), Theme::Light);
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    assert_eq!(
        *surface.applied.borrow(),
        vec![Theme::Light, Theme::Dark, Theme::Light]
    );
}
