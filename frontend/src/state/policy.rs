use leptos::*;

use super::container_message;
use crate::api::{ApiClient, ApiError, Policy, PolicyUpdate, PolicyUpload, UploadPolicyResponse};

pub type PolicyContext = (ReadSignal<PolicyState>, WriteSignal<PolicyState>);

#[derive(Debug, Clone, Default)]
pub struct PolicyState {
    pub policies: Vec<Policy>,
    pub current: Option<Policy>,
    pub loading: bool,
    pub error: Option<String>,
}

#[component]
pub fn PolicyProvider(children: Children) -> impl IntoView {
    let ctx = create_signal(PolicyState::default());
    provide_context::<PolicyContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_policies() -> PolicyContext {
    use_context::<PolicyContext>().unwrap_or_else(|| create_signal(PolicyState::default()))
}

pub async fn fetch_policies(
    api: &ApiClient,
    set_state: WriteSignal<PolicyState>,
) -> Result<Vec<Policy>, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = api.get_policies().await;
    match &result {
        Ok(policies) => {
            let policies = policies.clone();
            set_state.update(move |s| {
                s.policies = policies;
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to load policies");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

pub async fn fetch_policy_detail(
    api: &ApiClient,
    set_state: WriteSignal<PolicyState>,
    policy_id: i64,
) -> Result<Policy, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = api.get_policy_detail(policy_id).await;
    match &result {
        Ok(policy) => {
            let policy = policy.clone();
            set_state.update(move |s| {
                s.current = Some(policy);
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to load the policy");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

pub async fn upload_policy(
    api: &ApiClient,
    set_state: WriteSignal<PolicyState>,
    upload: PolicyUpload,
) -> Result<UploadPolicyResponse, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match api.upload_policy(upload).await {
        Ok(response) => {
            set_state.update(|s| s.loading = false);
            let _ = fetch_policies(api, set_state).await;
            Ok(response)
        }
        Err(error) => {
            let message = container_message(&error, "Failed to upload the policy file");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    }
}

pub async fn update_policy(
    api: &ApiClient,
    set_state: WriteSignal<PolicyState>,
    policy_id: i64,
    request: PolicyUpdate,
) -> Result<Policy, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match api.update_policy(policy_id, &request).await {
        Ok(policy) => {
            set_state.update(|s| s.loading = false);
            let _ = fetch_policies(api, set_state).await;
            Ok(policy)
        }
        Err(error) => {
            let message = container_message(&error, "Failed to update the policy");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    }
}

pub async fn delete_policy(
    api: &ApiClient,
    set_state: WriteSignal<PolicyState>,
    policy_id: i64,
) -> Result<(), ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match api.delete_policy(policy_id).await {
        Ok(_) => {
            set_state.update(|s| s.loading = false);
            let _ = fetch_policies(api, set_state).await;
            Ok(())
        }
        Err(error) => {
            let message = container_message(&error, "Failed to delete the policy");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    }
}
