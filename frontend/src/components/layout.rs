use leptos::*;
use leptos_meta::Title;
use leptos_router::A;

use crate::components::toast::ToastHost;
use crate::state::user::use_user;

#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    let (user_state, _) = use_user();
    view! {
        <Title text="Leavedesk"/>
        <header class="app-header">
            <nav class="app-nav">
                <A href="/">"Home"</A>
                <A href="/chat">"Assistant"</A>
                <A href="/leave-list">"My leave"</A>
                <A href="/policy-list">"Policies"</A>
                <A href="/user">"Me"</A>
                <Show when=move || !user_state.get().logged_in fallback=|| ()>
                    <A href="/login">"Sign in"</A>
                </Show>
            </nav>
        </header>
        <main class="app-main">{children()}</main>
        <ToastHost/>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! { <div class="loading-spinner animate-spin"></div> }
}
