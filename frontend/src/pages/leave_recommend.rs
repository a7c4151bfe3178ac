use leptos::ev::SubmitEvent;
use leptos::*;

use crate::api::{use_api, LeavePlan, RecommendationRequest};
use crate::components::error::ErrorBanner;
use crate::state::leave::{self, use_leave};
use crate::state::user::use_user;
use crate::utils::datetime::parse_date;

#[component]
pub fn LeaveRecommendPage() -> impl IntoView {
    let api = use_api();
    let (leave_state, set_leave_state) = use_leave();
    let (user_state, _) = use_user();

    let (start_raw, set_start_raw) = create_signal(String::new());
    let (end_raw, set_end_raw) = create_signal(String::new());
    let (reason, set_reason) = create_signal(String::new());
    let (form_error, set_form_error) = create_signal(None::<String>);

    let recommend_action = {
        let api = api.clone();
        create_action(move |request: &RecommendationRequest| {
            let api = api.clone();
            let request = request.clone();
            async move { leave::fetch_recommendations(&api, set_leave_state, request).await }
        })
    };
    let pending = recommend_action.pending();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let Some(user_id) = user_state.get_untracked().user.map(|user| user.profile.id) else {
            return;
        };
        match build_recommendation_request(
            user_id,
            &start_raw.get_untracked(),
            &end_raw.get_untracked(),
            &reason.get_untracked(),
        ) {
            Ok(request) => {
                set_form_error.set(None);
                recommend_action.dispatch(request);
            }
            Err(message) => set_form_error.set(Some(message)),
        }
    };

    let on_clear = move |_| leave::clear_recommendation(set_leave_state);

    view! {
        <section class="page leave-recommend-page">
            <h1>"Leave recommendations"</h1>
            <form on:submit=on_submit>
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
                <button type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Asking..." } else { "Get recommendations" }}
                </button>
                <button type="button" class="link-button" on:click=on_clear>
                    "Clear"
                </button>
            </form>
            <div class="plans">
                <For
                    each=move || {
                        leave_state
                            .get()
                            .recommendation
                            .map(|r| r.recommendations)
                            .unwrap_or_default()
                    }
                    key=|plan| plan.plan_name.clone()
                    children=move |plan: LeavePlan| {
                        view! {
                            <article class="plan">
                                <h3>{plan.plan_name.clone()}</h3>
                                <p>{format!("{} · {} days", plan.leave_type, plan.days)}</p>
                                {plan
                                    .impact
                                    .clone()
                                    .map(|impact| view! { <p class="impact">{impact}</p> })}
                                <ul class="pros">
                                    {plan
                                        .pros
                                        .iter()
                                        .map(|item| view! { <li>{item.clone()}</li> })
                                        .collect_view()}
                                </ul>
                                <ul class="cons">
                                    {plan
                                        .cons
                                        .iter()
                                        .map(|item| view! { <li>{item.clone()}</li> })
                                        .collect_view()}
                                </ul>
                                {plan
                                    .recommendation_level
                                    .clone()
                                    .map(|level| view! { <span class="level">{level}</span> })}
                            </article>
                        }
                    }
                />
            </div>
        </section>
    }
}

pub fn build_recommendation_request(
    user_id: i64,
    start_raw: &str,
    end_raw: &str,
    reason: &str,
) -> Result<RecommendationRequest, String> {
    let start_date = parse_date(start_raw).ok_or("Enter a valid start date")?;
    let end_date = parse_date(end_raw).ok_or("Enter a valid end date")?;
    if end_date < start_date {
        return Err("The end date must not be before the start date".into());
    }
    let reason = reason.trim();
    if reason.is_empty() {
        return Err("Describe why you need the leave".into());
    }
    Ok(RecommendationRequest {
        user_id,
        start_date,
        end_date,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::build_recommendation_request;

    #[test]
    fn builds_a_request_from_valid_input() {
        let request =
            build_recommendation_request(7, "2024-05-01", "2024-05-03", "trip").unwrap();
        assert_eq!(request.user_id, 7);
        assert_eq!(request.reason, "trip");
    }

    #[test]
    fn rejects_reversed_ranges_and_blank_reason() {
        assert!(build_recommendation_request(7, "2024-05-03", "2024-05-01", "trip").is_err());
        assert!(build_recommendation_request(7, "2024-05-01", "2024-05-03", "  ").is_err());
        assert!(build_recommendation_request(7, "", "2024-05-03", "trip").is_err());
    }
}
