//! Corner stack rendering the app's toasts.

use leptos::prelude::*;

use crate::state::toast::{ToastPhase, Toaster};

/// Tick period for fading and removing toasts.
#[cfg(feature = "csr")]
const TICK_MS: u32 = 100;

/// Renders every live toast and drives their timers.
#[component]
pub fn ToastHost() -> impl IntoView {
    let toaster = expect_context::<Toaster>();
    let surface = toaster.surface();

    // Mounted once for the page lifetime.
    #[cfg(feature = "csr")]
    let _ = gloo_timers::callback::Interval::new(TICK_MS, move || toaster.tick()).forget();

    view! {
        <div class="toast-host" aria-live="polite">
            {move || {
                surface.with(|s| {
                    s.toasts()
                        .iter()
                        .map(|toast| {
                            let id = toast.id;
                            let class = format!(
                                "toast {}{}",
                                toast.severity.class(),
                                if toast.phase == ToastPhase::Fading { " toast--fading" } else { "" },
                            );
                            view! {
                                <div class=class role="status">
                                    <span class="toast__message">{toast.message.clone()}</span>
                                    <button class="toast__close" on:click=move |_| toaster.dismiss(id) title="Dismiss">
                                        "✕"
                                    </button>
                                </div>
                            }
                        })
                        .collect_view()
                })
            }}
        </div>
    }
}
