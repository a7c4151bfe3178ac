use leptos::*;
use leptos_router::A;

use crate::api::{use_api, LeaveRequest, LeaveStatus};
use crate::components::empty_state::EmptyState;
use crate::components::error::ErrorBanner;
use crate::components::layout::LoadingSpinner;
use crate::state::leave::{self, use_leave};
use crate::state::user::use_user;

#[component]
pub fn LeaveListPage() -> impl IntoView {
    let api = use_api();
    let (leave_state, set_leave_state) = use_leave();
    let (user_state, _) = use_user();

    {
        let api = api.clone();
        create_effect(move |_| {
            let Some(user_id) = user_state.get_untracked().user.map(|user| user.profile.id)
            else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let _ = leave::fetch_leave_requests(&api, set_leave_state, user_id).await;
            });
        });
    }

    let cancel_action = {
        let api = api.clone();
        create_action(move |leave_id: &i64| {
            let api = api.clone();
            let leave_id = *leave_id;
            async move {
                let Some(user_id) = user_state.get_untracked().user.map(|user| user.profile.id)
                else {
                    return Ok(());
                };
                leave::cancel_leave(&api, set_leave_state, leave_id, user_id).await
            }
        })
    };

    view! {
        <section class="page leave-list-page">
            <h1>"My leave requests"</h1>
            <A class="new-request" href="/leave-apply">"New request"</A>
            <ErrorBanner message=Signal::derive(move || leave_state.get().error)/>
            <Show when=move || leave_state.get().loading fallback=|| ()>
                <LoadingSpinner/>
            </Show>
            <Show
                when=move || {
                    let state = leave_state.get();
                    !state.loading && state.requests.is_empty()
                }
                fallback=|| ()
            >
                <EmptyState label="No leave requests yet"/>
            </Show>
            <ul class="leave-requests">
                <For
                    each=move || leave_state.get().requests
                    key=|request| request.id
                    children=move |request: LeaveRequest| {
                        let badge_style = format!("color: {}", request.status.color());
                        let detail_href = format!("/leave-detail/{}", request.id);
                        let cancellable = request.status == LeaveStatus::Pending;
                        let id = request.id;
                        view! {
                            <li class="leave-request">
                                <A href=detail_href>
                                    {format!(
                                        "{} — {} to {} ({} days)",
                                        request.leave_type,
                                        request.start_date,
                                        request.end_date,
                                        request.days,
                                    )}
                                </A>
                                <span class="status" style=badge_style>
                                    {request.status.label()}
                                </span>
                                <Show when=move || cancellable fallback=|| ()>
                                    <button on:click=move |_| cancel_action.dispatch(id)>
                                        "Cancel"
                                    </button>
                                </Show>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}
