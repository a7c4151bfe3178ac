use leptos::*;

use crate::router::login_redirect_target;
use crate::session::use_session;

/// Renders children only for an authenticated session; otherwise navigates
/// to the login page, carrying the intended path along. The check reads
/// only the local session store.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let allowed = session.is_authenticated();

    create_effect(move |_| {
        if allowed {
            return;
        }
        if let Some(window) = web_sys::window() {
            let location = window.location();
            let path = location.pathname().unwrap_or_default();
            let search = location.search().unwrap_or_default();
            let _ = location.set_href(&login_redirect_target(&format!("{}{}", path, search)));
        }
    });

    view! {
        <Show when=move || allowed fallback=|| ()>
            {children()}
        </Show>
    }
}

/// Admin-gated variant: unauthenticated users go to login, authenticated
/// non-admins go back to the home route.
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let authenticated = session.is_authenticated();
    let admin = session.is_admin();

    create_effect(move |_| {
        if authenticated && admin {
            return;
        }
        if let Some(window) = web_sys::window() {
            let location = window.location();
            if !authenticated {
                let path = location.pathname().unwrap_or_default();
                let search = location.search().unwrap_or_default();
                let _ =
                    location.set_href(&login_redirect_target(&format!("{}{}", path, search)));
            } else {
                let _ = location.set_href("/");
            }
        }
    });

    view! {
        <Show when=move || authenticated && admin fallback=|| ()>
            {children()}
        </Show>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::{RequireAdmin, RequireAuth};
    use crate::session::Session;
    use crate::test_support::helpers::{admin_user, regular_user};
    use crate::test_support::ssr::render_to_string;
    use leptos::*;

    #[test]
    fn require_auth_renders_children_for_a_session_with_a_token() {
        let html = render_to_string(move || {
            let session = Session::in_memory();
            session.set_token("tok");
            provide_context(session);
            view! {
                <RequireAuth>
                    {|| view! { <div>"protected-content"</div> }}
                </RequireAuth>
            }
        });
        assert!(html.contains("protected-content"));
    }

    #[test]
    fn require_auth_hides_children_without_a_token() {
        let html = render_to_string(move || {
            provide_context(Session::in_memory());
            view! {
                <RequireAuth>
                    {|| view! { <div>"protected-content"</div> }}
                </RequireAuth>
            }
        });
        assert!(!html.contains("protected-content"));
    }

    #[test]
    fn require_admin_renders_children_for_an_admin_session() {
        let html = render_to_string(move || {
            let session = Session::in_memory();
            session.set_token("tok");
            session.set_user(&admin_user());
            provide_context(session);
            view! {
                <RequireAdmin>
                    {|| view! { <div>"admin-content"</div> }}
                </RequireAdmin>
            }
        });
        assert!(html.contains("admin-content"));
    }

    #[test]
    fn require_admin_hides_children_for_a_regular_session() {
        let html = render_to_string(move || {
            let session = Session::in_memory();
            session.set_token("tok");
            session.set_user(&regular_user());
            provide_context(session);
            view! {
                <RequireAdmin>
                    {|| view! { <div>"admin-content"</div> }}
                </RequireAdmin>
            }
        });
        assert!(!html.contains("admin-content"));
    }

    #[test]
    fn require_admin_hides_children_when_only_a_token_exists() {
        let html = render_to_string(move || {
            let session = Session::in_memory();
            session.set_token("tok");
            provide_context(session);
            view! {
                <RequireAdmin>
                    {|| view! { <div>"admin-content"</div> }}
                </RequireAdmin>
            }
        });
        assert!(!html.contains("admin-content"));
    }
}
