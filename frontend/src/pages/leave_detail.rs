use leptos::*;
use leptos_router::{use_params_map, A};

use crate::api::{use_api, ApproveLeaveRequest, LeaveStatus};
use crate::components::error::ErrorBanner;
use crate::components::layout::LoadingSpinner;
use crate::state::leave::{self, use_leave};
use crate::state::user::use_user;

#[component]
pub fn LeaveDetailPage() -> impl IntoView {
    let api = use_api();
    let (leave_state, set_leave_state) = use_leave();
    let (user_state, _) = use_user();

    let params = use_params_map();
    let leave_id = create_memo(move |_| {
        params.with(|map| map.get("id").and_then(|raw| raw.parse::<i64>().ok()))
    });

    {
        let api = api.clone();
        create_effect(move |_| {
            let Some(id) = leave_id.get() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let _ = leave::fetch_leave_detail(&api, set_leave_state, id).await;
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
                leave::cancel_leave(&api, set_leave_state, leave_id, user_id).await?;
                leave::fetch_leave_detail(&api, set_leave_state, leave_id)
                    .await
                    .map(|_| ())
            }
        })
    };

    let decide_action = {
        let api = api.clone();
        create_action(move |input: &(i64, bool)| {
            let api = api.clone();
            let (leave_id, approved) = *input;
            async move {
                let Some(user_id) = user_state.get_untracked().user.map(|user| user.profile.id)
                else {
                    return Ok(());
                };
                let request = ApproveLeaveRequest {
                    approved,
                    comment: None,
                };
                leave::approve_leave(&api, set_leave_state, leave_id, user_id, request).await?;
                leave::fetch_leave_detail(&api, set_leave_state, leave_id)
                    .await
                    .map(|_| ())
            }
        })
    };

    on_cleanup(move || leave::clear_current(set_leave_state));

    let is_admin = create_memo(move |_| {
        user_state
            .get()
            .user
            .map(|user| user.profile.is_admin)
            .unwrap_or(false)
    });

    view! {
        <section class="page leave-detail-page">
            <h1>"Leave request"</h1>
            <A href="/leave-list">"Back to my requests"</A>
            <ErrorBanner message=Signal::derive(move || leave_state.get().error)/>
            <Show when=move || leave_state.get().loading fallback=|| ()>
                <LoadingSpinner/>
            </Show>
            {move || {
                leave_state.get().current.map(|detail| {
                    let id = detail.id;
                    let pending = detail.status == LeaveStatus::Pending;
                    let badge_style = format!("color: {}", detail.status.color());
                    view! {
                        <dl class="leave-detail">
                            <dt>"Type"</dt>
                            <dd>{detail.leave_type.clone()}</dd>
                            <dt>"Dates"</dt>
                            <dd>
                                {format!(
                                    "{} to {} ({} days)",
                                    detail.start_date,
                                    detail.end_date,
                                    detail.days,
                                )}
                            </dd>
                            <dt>"Reason"</dt>
                            <dd>{detail.reason.clone()}</dd>
                            <dt>"Status"</dt>
                            <dd>
                                <span class="status" style=badge_style>
                                    {detail.status.label()}
                                </span>
                            </dd>
                            {detail.created_at.clone().map(|created_at| {
                                view! {
                                    <dt>"Submitted"</dt>
                                    <dd>{created_at}</dd>
                                }
                            })}
                        </dl>
                        <div class="actions">
                            <Show when=move || pending fallback=|| ()>
                                <button on:click=move |_| cancel_action.dispatch(id)>
                                    "Cancel request"
                                </button>
                            </Show>
                            <Show when=move || pending && is_admin.get() fallback=|| ()>
                                <button on:click=move |_| decide_action.dispatch((id, true))>
                                    "Approve"
                                </button>
                                <button on:click=move |_| decide_action.dispatch((id, false))>
                                    "Reject"
                                </button>
                            </Show>
                        </div>
                    }
                })
            }}
        </section>
    }
}
