use leptos::*;
use leptos_router::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="page not-found-page">
            <h1>"Page not found"</h1>
            <A href="/">"Back to home"</A>
        </section>
    }
}
