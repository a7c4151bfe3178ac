use leptos::*;

#[component]
pub fn EmptyState(#[prop(into)] label: String) -> impl IntoView {
    view! { <div class="empty-state">{label}</div> }
}
