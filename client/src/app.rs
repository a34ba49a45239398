//! Root application shell.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted on every LPS2 page. Provides the shared API client, session
//! status, toast surface and confirmation dialog through context, then
//! renders the header chrome. Page-specific scripts read the same contexts.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::components::confirm_modal::ConfirmModalHost;
use crate::components::nav_bar::NavBar;
use crate::components::theme_toggle::ThemeToggle;
use crate::components::toast_host::ToastHost;
use crate::net::api::ApiClient;
use crate::net::auth::{AuthCache, AuthState};
use crate::net::config::ClientConfig;
use crate::net::dispatcher::Dispatcher;
use crate::net::transport::browser::BrowserTransport;
use crate::state::confirm::{ConfirmOptions, Confirmer};
use crate::state::toast::{Severity, Toaster};
use crate::util::alert::BrowserAlert;
use crate::util::nav::NavMemory;
use crate::util::storage::LocalStorage;

/// API client type shared through context.
pub type BrowserApi = ApiClient<BrowserTransport, BrowserAlert>;

fn current_path() -> Option<String> {
    web_sys::window().and_then(|w| w.location().pathname().ok())
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    // Every cache write, including refreshes inside mutating calls, lands in the signal.
    let cache = AuthCache::with_listener(move |state| auth.set(state.clone()));
    let api: BrowserApi = ApiClient::from_dispatcher(Dispatcher::with_cache(
        BrowserTransport,
        BrowserAlert,
        ClientConfig::same_origin(),
        cache,
    ));
    let toaster = Toaster::new();
    let confirmer = Confirmer::new();
    let nav = NavMemory::new(LocalStorage);
    let active = RwSignal::new(nav.resolve(current_path().as_deref(), &AuthState::default()));

    provide_context(api.clone());
    provide_context(auth);
    provide_context(toaster);
    provide_context(confirmer);
    provide_context(active);

    let startup_api = api.clone();
    leptos::task::spawn_local(async move {
        let state = startup_api.auth_status().await;
        active.set(nav.resolve(current_path().as_deref(), &state));
    });

    let on_logout = Callback::new(move |()| {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            let confirmed = confirmer
                .confirm("Log out of LPS2?", ConfirmOptions::destructive("Log out"))
                .wait()
                .await;
            if !confirmed {
                return;
            }
            match api.logout().await {
                Ok(()) => toaster.show("Logged out", Severity::Success),
                Err(e) => {
                    log::warn!("logout failed: {e}");
                    toaster.show(format!("Logout failed: {e}"), Severity::Error);
                }
            }
        });
    });

    let user_name = move || auth.get().user.unwrap_or_default();

    view! {
        <Title text="LPS2"/>
        <header class="app-header">
            <span class="app-header__brand">"LPS2"</span>
            <nav class="nav">
                <NavBar/>
            </nav>
            <span class="app-header__spacer"></span>
            <ThemeToggle/>
            <Show when=move || auth.get().authenticated>
                <span class="app-header__user">{user_name}</span>
                <button class="btn app-header__logout" on:click=move |_| on_logout.run(())>
                    "Log out"
                </button>
            </Show>
        </header>
        <ToastHost/>
        <ConfirmModalHost/>
    }
}

