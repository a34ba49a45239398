//! App-wide confirmation dialog.

use leptos::prelude::*;

use crate::state::confirm::Confirmer;

/// Shows the pending confirmation, if any. Enter confirms, Escape and the
/// backdrop cancel.
#[component]
pub fn ConfirmModalHost() -> impl IntoView {
    let confirmer = expect_context::<Confirmer>();

    let on_keydown = Callback::new(move |ev: leptos::ev::KeyboardEvent| {
        if confirmer.handle_key(&ev.key()) {
            ev.prevent_default();
        }
    });

    move || {
        confirmer.request().map(|request| {
            let confirm_class = if request.options.destructive {
                "btn confirm-modal__confirm btn--danger"
            } else {
                "btn confirm-modal__confirm btn--primary"
            };
            view! {
                <div class="confirm-modal__backdrop" on:click=move |_| confirmer.resolve(false)>
                    <div
                        class="confirm-modal"
                        role="dialog"
                        aria-modal="true"
                        tabindex="0"
                        on:click=move |ev| ev.stop_propagation()
                        on:keydown=move |ev| on_keydown.run(ev)
                    >
                        <p class="confirm-modal__message">{request.message}</p>
                        <div class="confirm-modal__actions">
                            <button class="btn confirm-modal__cancel" on:click=move |_| confirmer.resolve(false)>
                                "Cancel"
                            </button>
                            <button class=confirm_class autofocus=true on:click=move |_| confirmer.resolve(true)>
                                {request.options.confirm_label}
                            </button>
                        </div>
                    </div>
                </div>
            }
        })
    }
}
