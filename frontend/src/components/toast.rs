use std::cell::Cell;
use std::rc::Rc;

use leptos::*;

use crate::notify::Notifier;

#[cfg(target_arch = "wasm32")]
const TOAST_DURATION_MS: u32 = 3_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: usize,
    pub message: String,
}

pub type ToastContext = (ReadSignal<Vec<Toast>>, WriteSignal<Vec<Toast>>);

/// Provides the toast list context and returns the notifier feeding it.
/// Each notice auto-dismisses after a fixed duration.
pub fn provide_toasts() -> Notifier {
    let (toasts, set_toasts) = create_signal(Vec::<Toast>::new());
    provide_context::<ToastContext>((toasts, set_toasts));

    let next_id = Rc::new(Cell::new(0usize));
    Notifier::new(move |message| {
        let id = next_id.get();
        next_id.set(id + 1);
        set_toasts.update(|list| list.push(Toast { id, message }));
        #[cfg(target_arch = "wasm32")]
        {
            gloo_timers::callback::Timeout::new(TOAST_DURATION_MS, move || {
                set_toasts.update(|list| list.retain(|toast| toast.id != id));
            })
            .forget();
        }
    })
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let (toasts, _) = use_context::<ToastContext>().unwrap_or_else(|| create_signal(Vec::new()));
    view! {
        <div class="toast-host">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast: Toast| {
                    view! { <div class="toast">{toast.message}</div> }
                }
            />
        </div>
    }
}
