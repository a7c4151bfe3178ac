use leptos::*;
use leptos_router::A;

use crate::state::user::use_user;

#[component]
pub fn HomePage() -> impl IntoView {
    let (user_state, _) = use_user();
    view! {
        <section class="page home-page">
            <h1>"Leavedesk"</h1>
            <Show
                when=move || user_state.get().logged_in
                fallback=|| view! { <p>"Sign in to submit and track leave requests."</p> }
            >
                {move || {
                    let state = user_state.get();
                    let greeting = state
                        .user
                        .as_ref()
                        .and_then(|user| user.profile.full_name.clone())
                        .unwrap_or_else(|| "there".to_string());
                    let remaining = state
                        .user
                        .as_ref()
                        .and_then(|user| user.annual_leave.as_ref())
                        .map(|quota| quota.remaining_days);
                    view! {
                        <div class="home-summary">
                            <p>{format!("Welcome back, {}.", greeting)}</p>
                            {remaining.map(|days| {
                                view! {
                                    <p class="quota">
                                        {format!("{} annual leave days remaining", days)}
                                    </p>
                                }
                            })}
                        </div>
                    }
                }}
            </Show>
            <nav class="quick-links">
                <A href="/leave-apply">"Apply for leave"</A>
                <A href="/leave-recommend">"Plan with recommendations"</A>
                <A href="/leave-list">"My requests"</A>
                <A href="/chat">"Ask the assistant"</A>
                <A href="/policy-list">"Company policies"</A>
            </nav>
        </section>
    }
}
