use leptos::*;

use super::container_message;
use crate::api::{
    ApiClient, ApiError, ChangePasswordRequest, LoginRequest, UpdateUserRequest, UserInfo,
};
use crate::session::use_session;

pub type UserContext = (ReadSignal<UserState>, WriteSignal<UserState>);

#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub user: Option<UserInfo>,
    pub logged_in: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[component]
pub fn UserProvider(children: Children) -> impl IntoView {
    let (state, set_state) = create_signal(UserState::default());

    // Restore the persisted profile so a reload keeps the user signed in.
    let session = use_session();
    if session.is_authenticated() {
        if let Some(user) = session.user() {
            set_state.update(|s| {
                s.user = Some(user);
                s.logged_in = true;
            });
        }
    }

    provide_context::<UserContext>((state, set_state));
    view! { <>{children()}</> }
}

pub fn use_user() -> UserContext {
    use_context::<UserContext>().unwrap_or_else(|| create_signal(UserState::default()))
}

/// Token first, then profile, then annual leave, merged and persisted.
/// There is no compensation: a failure in the later fetches keeps the
/// stored token.
pub async fn login(
    api: &ApiClient,
    set_state: WriteSignal<UserState>,
    username: String,
    password: String,
) -> Result<UserInfo, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = login_flow(api, username, password).await;
    match &result {
        Ok(user) => {
            let user = user.clone();
            set_state.update(move |s| {
                s.user = Some(user);
                s.logged_in = true;
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Login failed");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

async fn login_flow(
    api: &ApiClient,
    username: String,
    password: String,
) -> Result<UserInfo, ApiError> {
    let response = api.login(&LoginRequest { username, password }).await?;
    api.session().set_token(&response.access_token);
    load_profile(api, response.user_id).await
}

async fn load_profile(api: &ApiClient, user_id: i64) -> Result<UserInfo, ApiError> {
    let profile = api.get_user(user_id).await?;
    let annual_leave = api.get_annual_leave(user_id).await?;
    let user = UserInfo {
        profile,
        annual_leave: Some(annual_leave),
    };
    api.session().set_user(&user);
    Ok(user)
}

pub async fn fetch_user_info(
    api: &ApiClient,
    set_state: WriteSignal<UserState>,
    user_id: i64,
) -> Result<UserInfo, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = load_profile(api, user_id).await;
    match &result {
        Ok(user) => {
            let user = user.clone();
            set_state.update(move |s| {
                s.user = Some(user);
                s.logged_in = true;
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to load user profile");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

pub async fn update_profile(
    api: &ApiClient,
    set_state: WriteSignal<UserState>,
    user_id: i64,
    request: UpdateUserRequest,
) -> Result<UserInfo, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = async {
        api.update_user(user_id, &request).await?;
        load_profile(api, user_id).await
    }
    .await;

    match &result {
        Ok(user) => {
            let user = user.clone();
            set_state.update(move |s| {
                s.user = Some(user);
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to update profile");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

pub async fn change_password(
    api: &ApiClient,
    set_state: WriteSignal<UserState>,
    user_id: i64,
    request: ChangePasswordRequest,
) -> Result<(), ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = api.change_password(user_id, &request).await;
    match &result {
        Ok(_) => set_state.update(|s| s.loading = false),
        Err(error) => {
            let message = container_message(error, "Failed to change password");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result.map(|_| ())
}

pub fn logout(api: &ApiClient, set_state: WriteSignal<UserState>) {
    api.session().clear();
    set_state.update(|s| {
        s.user = None;
        s.logged_in = false;
        s.error = None;
    });
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn user_json() -> serde_json::Value {
        json!({
            "id": 7,
            "username": "alice",
            "full_name": "Alice Example",
            "is_active": true,
            "is_admin": false
        })
    }

    #[tokio::test]
    async fn login_chain_merges_profile_and_annual_leave() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200)
                .json_body(json!({ "access_token": "tok-1", "user_id": 7 }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/users/7");
            then.status(200).json_body(user_json());
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/users/7/annual-leave");
            then.status(200)
                .json_body(json!({ "total_days": 15.0, "used_days": 3.0, "remaining_days": 12.0 }));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(UserState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let user = login(&api, set_state, "alice".into(), "secret".into())
            .await
            .unwrap();
        assert_eq!(user.annual_leave.unwrap().remaining_days, 12.0);

        let snapshot = state.get();
        assert!(snapshot.logged_in);
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.user.unwrap().profile.username, "alice");

        // Session persisted for reload survival.
        assert_eq!(api.session().token().as_deref(), Some("tok-1"));
        assert!(api.session().user().is_some());
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_credentials_store_the_server_detail() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(400)
                .json_body(json!({ "detail": "bad credentials" }));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(UserState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let error = login(&api, set_state, "alice".into(), "wrong".into())
            .await
            .unwrap_err();
        assert_eq!(error.server_detail(), Some("bad credentials"));

        let snapshot = state.get();
        assert!(!snapshot.logged_in);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error.as_deref(), Some("bad credentials"));
        assert!(api.session().token().is_none());
        runtime.dispose();
    }

    #[tokio::test]
    async fn token_is_retained_when_the_profile_fetch_fails() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200)
                .json_body(json!({ "access_token": "tok-1", "user_id": 7 }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/users/7");
            then.status(500).json_body(json!({ "detail": "boom" }));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(UserState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let error = login(&api, set_state, "alice".into(), "secret".into())
            .await
            .unwrap_err();
        assert_eq!(error, ApiError::Server);

        let snapshot = state.get();
        assert!(!snapshot.logged_in);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Login failed"),
            "500 carries no detail for the container"
        );
        // Step 1 succeeded and is not rolled back.
        assert_eq!(api.session().token().as_deref(), Some("tok-1"));
        runtime.dispose();
    }

    #[tokio::test]
    async fn logout_clears_state_and_session() {
        let runtime = create_runtime();
        let (state, set_state) = create_signal(UserState::default());
        let api = ApiClient::new_with_base_url("http://127.0.0.1:9/api");

        api.session().set_token("tok-1");
        set_state.update(|s| s.logged_in = true);

        logout(&api, set_state);

        assert!(!state.get().logged_in);
        assert!(api.session().token().is_none());
        runtime.dispose();
    }
}
