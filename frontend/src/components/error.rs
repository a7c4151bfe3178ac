use leptos::*;

/// In-view rendering of a container's error field.
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some() fallback=|| ()>
            <div class="error-banner" role="alert">
                {move || message.get().unwrap_or_default()}
            </div>
        </Show>
    }
}
