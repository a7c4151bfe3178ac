use leptos::ev::SubmitEvent;
use leptos::*;
use leptos_router::A;

use crate::api::{use_api, ChangePasswordRequest, LeaveStats, UpdateUserRequest};
use crate::components::error::ErrorBanner;
use crate::state::user::{self, use_user};

#[component]
pub fn UserPage() -> impl IntoView {
    let api = use_api();
    let (user_state, set_user_state) = use_user();

    let (stats, set_stats) = create_signal(None::<LeaveStats>);
    let (edited_name, set_edited_name) = create_signal(String::new());
    let (old_password, set_old_password) = create_signal(String::new());
    let (new_password, set_new_password) = create_signal(String::new());
    let (password_notice, set_password_notice) = create_signal(None::<String>);

    let current_user_id = create_memo(move |_| {
        user_state.get().user.map(|user| user.profile.id)
    });

    {
        let api = api.clone();
        create_effect(move |_| {
            let Some(user_id) = current_user_id.get() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                if let Ok(loaded) = api.get_leave_stats(user_id).await {
                    set_stats.set(Some(loaded));
                }
            });
        });
    }

    let refresh_action = {
        let api = api.clone();
        create_action(move |user_id: &i64| {
            let api = api.clone();
            let user_id = *user_id;
            async move { user::fetch_user_info(&api, set_user_state, user_id).await }
        })
    };

    let rename_action = {
        let api = api.clone();
        create_action(move |input: &(i64, String)| {
            let api = api.clone();
            let (user_id, full_name) = input.clone();
            async move {
                let request = UpdateUserRequest {
                    email: None,
                    full_name: Some(full_name),
                    department: None,
                    position: None,
                };
                user::update_profile(&api, set_user_state, user_id, request).await
            }
        })
    };

    let on_rename = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = user_state.get_untracked().user.map(|user| user.profile.id) else {
            return;
        };
        let full_name = edited_name.get_untracked().trim().to_string();
        if full_name.is_empty() {
            return;
        }
        set_edited_name.set(String::new());
        rename_action.dispatch((user_id, full_name));
    };

    let password_action = {
        let api = api.clone();
        create_action(move |input: &(i64, String, String)| {
            let api = api.clone();
            let (user_id, old_password, new_password) = input.clone();
            async move {
                user::change_password(
                    &api,
                    set_user_state,
                    user_id,
                    ChangePasswordRequest {
                        old_password,
                        new_password,
                    },
                )
                .await
            }
        })
    };

    create_effect(move |_| {
        if let Some(Ok(())) = password_action.value().get() {
            set_password_notice.set(Some("Password changed".to_string()));
            set_old_password.set(String::new());
            set_new_password.set(String::new());
        }
    });

    let on_change_password = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = user_state.get_untracked().user.map(|user| user.profile.id) else {
            return;
        };
        let old = old_password.get_untracked();
        let new = new_password.get_untracked();
        if old.is_empty() || new.is_empty() {
            set_password_notice.set(Some("Fill in both password fields".to_string()));
            return;
        }
        set_password_notice.set(None);
        password_action.dispatch((user_id, old, new));
    };

    let on_logout = {
        let api = api.clone();
        move |_| {
            user::logout(&api, set_user_state);
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/");
            }
        }
    };

    view! {
        <section class="page user-page">
            <h1>"My profile"</h1>
            <Show
                when=move || user_state.get().logged_in
                fallback=|| view! { <p><A href="/login">"Sign in"</A>" to see your profile."</p> }
            >
                {move || {
                    let state = user_state.get();
                    state.user.map(|user| {
                        let profile = user.profile;
                        let user_id = profile.id;
                        view! {
                            <dl class="profile">
                                <dt>"Username"</dt>
                                <dd>{profile.username.clone()}</dd>
                                {profile.full_name.clone().map(|full_name| view! {
                                    <dt>"Name"</dt>
                                    <dd>{full_name}</dd>
                                })}
                                {profile.department.clone().map(|department| view! {
                                    <dt>"Department"</dt>
                                    <dd>{department}</dd>
                                })}
                                {profile.position.clone().map(|position| view! {
                                    <dt>"Position"</dt>
                                    <dd>{position}</dd>
                                })}
                                {profile.employee_id.clone().map(|employee_id| view! {
                                    <dt>"Employee ID"</dt>
                                    <dd>{employee_id}</dd>
                                })}
                                {profile.hire_date.clone().map(|hire_date| view! {
                                    <dt>"Hired"</dt>
                                    <dd>{hire_date}</dd>
                                })}
                            </dl>
                            {user.annual_leave.as_ref().map(|quota| {
                                view! {
                                    <p class="quota">
                                        {format!(
                                            "Annual leave: {} total, {} used, {} remaining",
                                            quota.total_days,
                                            quota.used_days,
                                            quota.remaining_days,
                                        )}
                                    </p>
                                }
                            })}
                            <button on:click=move |_| refresh_action.dispatch(user_id)>
                                "Refresh profile"
                            </button>
                        }
                    })
                }}
                {move || {
                    stats.get().map(|stats| {
                        view! {
                            <p class="leave-stats">
                                {format!(
                                    "Requests: {} total, {} pending, {} approved, {} rejected",
                                    stats.total,
                                    stats.pending,
                                    stats.approved,
                                    stats.rejected,
                                )}
                            </p>
                        }
                    })
                }}
                <form class="edit-profile" on:submit=on_rename>
                    <h2>"Update display name"</h2>
                    <input
                        type="text"
                        placeholder="Full name"
                        prop:value=edited_name
                        on:input=move |ev| set_edited_name.set(event_target_value(&ev))
                    />
                    <button type="submit">"Save name"</button>
                </form>
                <form class="change-password" on:submit=on_change_password>
                    <h2>"Change password"</h2>
                    <input
                        type="password"
                        placeholder="Current password"
                        prop:value=old_password
                        on:input=move |ev| set_old_password.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        placeholder="New password"
                        prop:value=new_password
                        on:input=move |ev| set_new_password.set(event_target_value(&ev))
                    />
                    {move || {
                        password_notice
                            .get()
                            .map(|notice| view! { <p class="notice">{notice}</p> })
                    }}
                    <button type="submit">"Update password"</button>
                </form>
                <ErrorBanner message=Signal::derive(move || user_state.get().error)/>
                <button class="logout" on:click=on_logout.clone()>"Sign out"</button>
            </Show>
        </section>
    }
}
