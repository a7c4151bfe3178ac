use leptos::ev::SubmitEvent;
use leptos::*;

use crate::api::{use_api, ApplyLeaveRequest, LeaveType};
use crate::components::error::ErrorBanner;
use crate::state::leave::{self, use_leave};
use crate::state::user::use_user;
use crate::utils::datetime::{calculate_days, calculate_work_days, parse_date};

#[component]
pub fn LeaveApplyPage() -> impl IntoView {
    let api = use_api();
    let leave_ctx = use_leave();
    let (leave_state, set_leave_state) = leave_ctx;
    let (user_state, _) = use_user();

    let (type_id, set_type_id) = create_signal(None::<i64>);
    let (start_raw, set_start_raw) = create_signal(String::new());
    let (end_raw, set_end_raw) = create_signal(String::new());
    let (reason, set_reason) = create_signal(String::new());
    let (form_error, set_form_error) = create_signal(None::<String>);
    let (submitted, set_submitted) = create_signal(None::<String>);

    {
        let api = api.clone();
        create_effect(move |_| {
            let api = api.clone();
            spawn_local(async move {
                let _ = leave::fetch_leave_types(&api, leave_ctx).await;
            });
        });
    }

    let span = create_memo(move |_| {
        let start = parse_date(&start_raw.get())?;
        let end = parse_date(&end_raw.get())?;
        Some((calculate_days(start, end), calculate_work_days(start, end)))
    });

    let apply_action = {
        let api = api.clone();
        create_action(move |request: &ApplyLeaveRequest| {
            let api = api.clone();
            let request = request.clone();
            async move { leave::apply_leave(&api, set_leave_state, request).await }
        })
    };
    let pending = apply_action.pending();

    create_effect(move |_| {
        if let Some(Ok(response)) = apply_action.value().get() {
            let message = response
                .message
                .unwrap_or_else(|| "Leave request submitted".to_string());
            set_submitted.set(Some(message));
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let Some(user_id) = user_state.get_untracked().user.map(|user| user.profile.id) else {
            return;
        };
        match build_apply_request(
            user_id,
            type_id.get_untracked(),
            &start_raw.get_untracked(),
            &end_raw.get_untracked(),
            &reason.get_untracked(),
        ) {
            Ok(request) => {
                set_form_error.set(None);
                set_submitted.set(None);
                apply_action.dispatch(request);
            }
            Err(message) => set_form_error.set(Some(message)),
        }
    };

    view! {
        <section class="page leave-apply-page">
            <h1>"Apply for leave"</h1>
            <form on:submit=on_submit>
                <label>
                    "Leave type"
                    <select on:change=move |ev| {
                        set_type_id.set(event_target_value(&ev).parse().ok());
                    }>
                        <option value="">"Select a leave type"</option>
                        <For
                            each=move || leave_state.get().leave_types
                            key=|leave_type| leave_type.id
                            children=move |leave_type: LeaveType| {
                                view! {
                                    <option value=leave_type.id.to_string()>
                                        {leave_type.name.clone()}
                                    </option>
                                }
                            }
                        />
                    </select>
                </label>
                <label>
                    "Start date"
                    <input
                        type="date"
                        prop:value=start_raw
                        on:input=move |ev| set_start_raw.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "End date"
                    <input
                        type="date"
                        prop:value=end_raw
                        on:input=move |ev| set_end_raw.set(event_target_value(&ev))
                    />
                </label>
                {move || {
                    span.get().map(|(days, work_days)| {
                        view! {
                            <p class="span-summary">
                                {format!("{} calendar days, {} working days", days, work_days)}
                            </p>
                        }
                    })
                }}
                <label>
                    "Reason"
                    <textarea
                        prop:value=reason
                        on:input=move |ev| set_reason.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <ErrorBanner message=Signal::derive(move || {
                    form_error.get().or_else(|| leave_state.get().error)
                })/>
                {move || {
                    submitted
                        .get()
                        .map(|message| view! { <p class="submit-result">{message}</p> })
                }}
                <button type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Submitting..." } else { "Submit request" }}
                </button>
            </form>
        </section>
    }
}

pub fn build_apply_request(
    user_id: i64,
    leave_type_id: Option<i64>,
    start_raw: &str,
    end_raw: &str,
    reason: &str,
) -> Result<ApplyLeaveRequest, String> {
    let leave_type_id = leave_type_id.ok_or("Select a leave type")?;
    let start_date = parse_date(start_raw).ok_or("Enter a valid start date")?;
    let end_date = parse_date(end_raw).ok_or("Enter a valid end date")?;
    if end_date < start_date {
        return Err("The end date must not be before the start date".into());
    }
    let reason = reason.trim();
    if reason.is_empty() {
        return Err("Enter a reason for the leave".into());
    }
    Ok(ApplyLeaveRequest {
        user_id,
        leave_type_id,
        start_date,
        end_date,
        reason: reason.to_string(),
        ai_recommendation: None,
    })
}

#[cfg(test)]
mod tests {
    use super::build_apply_request;

    #[test]
    fn builds_a_request_from_valid_form_input() {
        let request =
            build_apply_request(7, Some(2), "2024-05-01", "2024-05-03", " family visit ")
                .unwrap();
        assert_eq!(request.leave_type_id, 2);
        assert_eq!(request.reason, "family visit");
        assert!(request.ai_recommendation.is_none());
    }

    #[test]
    fn rejects_missing_type_bad_dates_and_blank_reason() {
        assert!(build_apply_request(7, None, "2024-05-01", "2024-05-03", "x").is_err());
        assert!(build_apply_request(7, Some(1), "not-a-date", "2024-05-03", "x").is_err());
        assert!(build_apply_request(7, Some(1), "2024-05-03", "2024-05-01", "x").is_err());
        assert!(build_apply_request(7, Some(1), "2024-05-01", "2024-05-03", "   ").is_err());
    }
}
