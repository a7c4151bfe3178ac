use leptos::ev::SubmitEvent;
use leptos::*;

use crate::api::use_api;
use crate::components::error::ErrorBanner;
use crate::router::redirect_from_query;
use crate::state::user::{self, use_user};

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = use_api();
    let (user_state, set_user_state) = use_user();
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (form_error, set_form_error) = create_signal(None::<String>);

    let login_action = create_action(move |credentials: &(String, String)| {
        let api = api.clone();
        let (username, password) = credentials.clone();
        async move { user::login(&api, set_user_state, username, password).await }
    });
    let pending = login_action.pending();

    create_effect(move |_| {
        if let Some(Ok(_)) = login_action.value().get() {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(&post_login_target());
            }
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let uname = username.get_untracked();
        let pword = password.get_untracked();
        if let Err(message) = validate_credentials(&uname, &pword) {
            set_form_error.set(Some(message));
            return;
        }
        set_form_error.set(None);
        login_action.dispatch((uname, pword));
    };

    view! {
        <section class="page login-page">
            <h1>"Sign in"</h1>
            <form on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=username
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <ErrorBanner message=Signal::derive(move || {
                    form_error.get().or_else(|| user_state.get().error)
                })/>
                <button type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </section>
    }
}

/// Where to go after a successful login: the preserved `redirect` query
/// parameter, else home.
fn post_login_target() -> String {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    redirect_from_query(&search).unwrap_or_else(|| "/".to_string())
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Enter your username".into());
    }
    if password.is_empty() {
        return Err("Enter your password".into());
    }
    Ok(())
}
