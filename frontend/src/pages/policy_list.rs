use leptos::*;
use leptos_router::A;

use crate::api::{use_api, Policy, PolicyUpdate};
use crate::components::empty_state::EmptyState;
use crate::components::error::ErrorBanner;
use crate::components::layout::LoadingSpinner;
use crate::state::policy::{self, use_policies};
use crate::state::user::use_user;

#[component]
pub fn PolicyListPage() -> impl IntoView {
    let api = use_api();
    let (policy_state, set_policy_state) = use_policies();
    let (user_state, _) = use_user();

    {
        let api = api.clone();
        create_effect(move |_| {
            let api = api.clone();
            spawn_local(async move {
                let _ = policy::fetch_policies(&api, set_policy_state).await;
            });
        });
    }

    let detail_action = {
        let api = api.clone();
        create_action(move |policy_id: &i64| {
            let api = api.clone();
            let policy_id = *policy_id;
            async move {
                policy::fetch_policy_detail(&api, set_policy_state, policy_id)
                    .await
                    .map(|_| ())
            }
        })
    };

    let archive_action = {
        let api = api.clone();
        create_action(move |policy_id: &i64| {
            let api = api.clone();
            let policy_id = *policy_id;
            async move {
                let request = PolicyUpdate {
                    title: None,
                    description: None,
                    category: None,
                    is_active: Some(false),
                };
                policy::update_policy(&api, set_policy_state, policy_id, request)
                    .await
                    .map(|_| ())
            }
        })
    };

    let delete_action = {
        let api = api.clone();
        create_action(move |policy_id: &i64| {
            let api = api.clone();
            let policy_id = *policy_id;
            async move { policy::delete_policy(&api, set_policy_state, policy_id).await }
        })
    };

    let is_admin = create_memo(move |_| {
        user_state
            .get()
            .user
            .map(|user| user.profile.is_admin)
            .unwrap_or(false)
    });

    view! {
        <section class="page policy-list-page">
            <h1>"Company policies"</h1>
            <Show when=move || is_admin.get() fallback=|| ()>
                <A class="upload-link" href="/policy-upload">"Upload a policy"</A>
            </Show>
            <ErrorBanner message=Signal::derive(move || policy_state.get().error)/>
            <Show when=move || policy_state.get().loading fallback=|| ()>
                <LoadingSpinner/>
            </Show>
            <Show
                when=move || {
                    let state = policy_state.get();
                    !state.loading && state.policies.is_empty()
                }
                fallback=|| ()
            >
                <EmptyState label="No policies published yet"/>
            </Show>
            <ul class="policies">
                <For
                    each=move || policy_state.get().policies
                    key=|policy| policy.id
                    children=move |policy: Policy| {
                        let id = policy.id;
                        view! {
                            <li class="policy">
                                <button
                                    class="policy-title"
                                    on:click=move |_| detail_action.dispatch(id)
                                >
                                    {policy.title.clone()}
                                </button>
                                {policy
                                    .category
                                    .clone()
                                    .map(|category| view! { <span class="category">{category}</span> })}
                                {policy
                                    .file_type
                                    .clone()
                                    .map(|file_type| view! { <span class="file-type">{file_type}</span> })}
                                <Show when=move || is_admin.get() fallback=|| ()>
                                    <button on:click=move |_| archive_action.dispatch(id)>
                                        "Archive"
                                    </button>
                                    <button on:click=move |_| delete_action.dispatch(id)>
                                        "Delete"
                                    </button>
                                </Show>
                            </li>
                        }
                    }
                />
            </ul>
            {move || {
                policy_state.get().current.map(|policy| {
                    view! {
                        <aside class="policy-detail">
                            <h2>{policy.title.clone()}</h2>
                            {policy
                                .description
                                .clone()
                                .map(|description| view! { <p>{description}</p> })}
                            {policy
                                .created_at
                                .clone()
                                .map(|created_at| view! { <p class="published">{created_at}</p> })}
                        </aside>
                    }
                })
            }}
        </section>
    }
}
