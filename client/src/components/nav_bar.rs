//! Section links across the top of every page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each section is its own server-rendered page, so links are plain anchors.
//! Clicking one records the choice so a bare visit lands on the same section.

use leptos::prelude::*;

use crate::net::auth::AuthState;
use crate::util::nav::{NavMemory, NavSection, build_nav};
use crate::util::storage::LocalStorage;

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let active = expect_context::<RwSignal<NavSection>>();

    move || {
        build_nav(&auth.get(), active.get())
            .into_iter()
            .map(|item| {
                let section = item.section;
                let class = if item.active { "nav__link nav__link--active" } else { "nav__link" };
                view! {
                    <a
                        class=class
                        href=section.href()
                        data-nav=section.id()
                        on:click=move |_| {
                            NavMemory::new(LocalStorage).remember(section);
                            active.set(section);
                        }
                    >
                        {section.label()}
                    </a>
                }
            })
            .collect_view()
    }
}
