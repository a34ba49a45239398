//! Light/dark switch button.

use leptos::prelude::*;

use crate::util::storage::LocalStorage;
use crate::util::theme::{DocumentTheme, ThemeController};

/// Applies the saved theme on mount and flips it on click.
#[component]
pub fn ThemeToggle() -> impl IntoView {
    let mut controller = ThemeController::new(LocalStorage, DocumentTheme);
    controller.init();
    let theme = RwSignal::new(controller);

    let on_toggle = move |_| {
        theme.update(|c| {
            c.toggle();
        });
    };

    view! {
        <button class="btn theme-toggle" on:click=on_toggle title="Toggle theme">
            {move || theme.with(ThemeController::label)}
        </button>
    }
}
