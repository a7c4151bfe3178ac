use leptos::*;
use leptos_meta::provide_meta_context;
use leptos_router::*;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

use crate::{
    api::ApiClient,
    components::{
        guard::{RequireAdmin, RequireAuth},
        layout::AppLayout,
        toast::provide_toasts,
    },
    pages::{
        chat::ChatPage, home::HomePage, leave_apply::LeaveApplyPage,
        leave_detail::LeaveDetailPage, leave_list::LeaveListPage,
        leave_recommend::LeaveRecommendPage, login::LoginPage, not_found::NotFoundPage,
        policy_list::PolicyListPage, policy_upload::PolicyUploadPage, user::UserPage,
    },
    session::Session,
    state::{
        chat::ChatProvider, leave::LeaveProvider, policy::PolicyProvider, user::UserProvider,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub path: &'static str,
    pub requires_auth: bool,
    pub requires_admin: bool,
}

pub const ROUTES: &[RouteMeta] = &[
    RouteMeta { path: "/", requires_auth: false, requires_admin: false },
    RouteMeta { path: "/login", requires_auth: false, requires_admin: false },
    RouteMeta { path: "/chat", requires_auth: true, requires_admin: false },
    RouteMeta { path: "/leave-apply", requires_auth: true, requires_admin: false },
    RouteMeta { path: "/leave-recommend", requires_auth: true, requires_admin: false },
    RouteMeta { path: "/leave-list", requires_auth: true, requires_admin: false },
    RouteMeta { path: "/leave-detail/:id", requires_auth: true, requires_admin: false },
    RouteMeta { path: "/policy-list", requires_auth: false, requires_admin: false },
    RouteMeta { path: "/policy-upload", requires_auth: true, requires_admin: true },
    RouteMeta { path: "/user", requires_auth: false, requires_admin: false },
];

pub fn route_meta(path: &str) -> Option<&'static RouteMeta> {
    ROUTES.iter().find(|meta| path_matches(meta.path, path))
}

fn path_matches(pattern: &str, path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    pattern_segments.len() == path_segments.len()
        && pattern_segments
            .iter()
            .zip(&path_segments)
            .all(|(pattern, segment)| pattern.starts_with(':') || pattern == segment)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    RedirectToLogin(String),
    RedirectHome,
}

/// Synchronous, local-only check: it consults the session store and never
/// the backend, so it is advisory; the backend enforces authorization
/// independently.
pub fn evaluate_guard(meta: &RouteMeta, session: &Session, full_path: &str) -> GuardOutcome {
    if meta.requires_auth && !session.is_authenticated() {
        return GuardOutcome::RedirectToLogin(login_redirect_target(full_path));
    }
    if meta.requires_admin && !session.is_admin() {
        return GuardOutcome::RedirectHome;
    }
    GuardOutcome::Allow
}

/// Login URL preserving the originally intended path for the post-login
/// redirect.
pub fn login_redirect_target(path: &str) -> String {
    format!(
        "/login?redirect={}",
        utf8_percent_encode(path, NON_ALPHANUMERIC)
    )
}

pub fn redirect_from_query(search: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    for pair in query.split('&') {
        let mut parts = pair.splitn(2, '=');
        if parts.next() != Some("redirect") {
            continue;
        }
        let raw = parts.next().unwrap_or("");
        if raw.is_empty() {
            return None;
        }
        return percent_decode_str(raw)
            .decode_utf8()
            .ok()
            .map(|decoded| decoded.into_owned());
    }
    None
}

#[cfg(target_arch = "wasm32")]
pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_meta_context();

    let session = Session::from_browser();
    provide_context(session.clone());

    let notifier = provide_toasts();
    provide_context(ApiClient::with_session(session).with_notifier(notifier));

    view! {
        <UserProvider>
            <LeaveProvider>
                <ChatProvider>
                    <PolicyProvider>
                        <Router>
                            <AppLayout>
                                <Routes>
                                    <Route path="/" view=HomePage/>
                                    <Route path="/login" view=LoginPage/>
                                    <Route path="/chat" view=ProtectedChat/>
                                    <Route path="/leave-apply" view=ProtectedLeaveApply/>
                                    <Route path="/leave-recommend" view=ProtectedLeaveRecommend/>
                                    <Route path="/leave-list" view=ProtectedLeaveList/>
                                    <Route path="/leave-detail/:id" view=ProtectedLeaveDetail/>
                                    <Route path="/policy-list" view=PolicyListPage/>
                                    <Route path="/policy-upload" view=ProtectedPolicyUpload/>
                                    <Route path="/user" view=UserPage/>
                                    <Route path="/*any" view=NotFoundPage/>
                                </Routes>
                            </AppLayout>
                        </Router>
                    </PolicyProvider>
                </ChatProvider>
            </LeaveProvider>
        </UserProvider>
    }
}

#[component]
fn ProtectedChat() -> impl IntoView {
    view! { <RequireAuth><ChatPage/></RequireAuth> }
}

#[component]
fn ProtectedLeaveApply() -> impl IntoView {
    view! { <RequireAuth><LeaveApplyPage/></RequireAuth> }
}

#[component]
fn ProtectedLeaveRecommend() -> impl IntoView {
    view! { <RequireAuth><LeaveRecommendPage/></RequireAuth> }
}

#[component]
fn ProtectedLeaveList() -> impl IntoView {
    view! { <RequireAuth><LeaveListPage/></RequireAuth> }
}

#[component]
fn ProtectedLeaveDetail() -> impl IntoView {
    view! { <RequireAuth><LeaveDetailPage/></RequireAuth> }
}

#[component]
fn ProtectedPolicyUpload() -> impl IntoView {
    view! { <RequireAdmin><PolicyUploadPage/></RequireAdmin> }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::helpers::{admin_user, regular_user};
    use std::collections::HashSet;

    #[test]
    fn no_duplicate_routes() {
        let unique: HashSet<&str> = ROUTES.iter().map(|meta| meta.path).collect();
        assert_eq!(unique.len(), ROUTES.len());
    }

    #[test]
    fn admin_routes_also_require_auth() {
        for meta in ROUTES.iter().filter(|meta| meta.requires_admin) {
            assert!(
                meta.requires_auth,
                "admin route must require auth: {}",
                meta.path
            );
        }
    }

    #[test]
    fn route_meta_matches_parameterized_paths() {
        assert_eq!(route_meta("/").unwrap().path, "/");
        assert_eq!(
            route_meta("/leave-detail/42").unwrap().path,
            "/leave-detail/:id"
        );
        assert_eq!(
            route_meta("/leave-list?refresh=1").unwrap().path,
            "/leave-list"
        );
        assert!(route_meta("/leave-detail").is_none());
        assert!(route_meta("/nope").is_none());
    }

    #[test]
    fn guard_redirects_unauthenticated_users_to_login_with_the_original_path() {
        let session = Session::in_memory();
        let meta = route_meta("/leave-list").unwrap();

        let outcome = evaluate_guard(meta, &session, "/leave-list?refresh=1");
        let GuardOutcome::RedirectToLogin(target) = outcome else {
            panic!("expected a login redirect");
        };
        assert!(target.starts_with("/login?redirect="));
        let (_, search) = target.split_once('?').unwrap();
        assert_eq!(
            redirect_from_query(search).as_deref(),
            Some("/leave-list?refresh=1")
        );
    }

    #[test]
    fn guard_sends_authenticated_non_admins_home_from_admin_routes() {
        let session = Session::in_memory();
        session.set_token("tok");
        session.set_user(&regular_user());

        let meta = route_meta("/policy-upload").unwrap();
        assert_eq!(
            evaluate_guard(meta, &session, "/policy-upload"),
            GuardOutcome::RedirectHome
        );
    }

    #[test]
    fn guard_allows_admins_through_admin_routes() {
        let session = Session::in_memory();
        session.set_token("tok");
        session.set_user(&admin_user());

        let meta = route_meta("/policy-upload").unwrap();
        assert_eq!(
            evaluate_guard(meta, &session, "/policy-upload"),
            GuardOutcome::Allow
        );
    }

    #[test]
    fn guard_allows_public_routes_without_a_session() {
        let session = Session::in_memory();
        let meta = route_meta("/policy-list").unwrap();
        assert_eq!(
            evaluate_guard(meta, &session, "/policy-list"),
            GuardOutcome::Allow
        );
    }

    #[test]
    fn a_token_without_a_persisted_admin_record_is_not_admin() {
        let session = Session::in_memory();
        session.set_token("tok");

        let meta = route_meta("/policy-upload").unwrap();
        assert_eq!(
            evaluate_guard(meta, &session, "/policy-upload"),
            GuardOutcome::RedirectHome
        );
    }

    #[test]
    fn redirect_query_round_trips_paths_with_separators() {
        let target = login_redirect_target("/leave-detail/42?tab=history");
        let (_, search) = target.split_once('?').unwrap();
        assert_eq!(
            redirect_from_query(search).as_deref(),
            Some("/leave-detail/42?tab=history")
        );
    }

    #[test]
    fn redirect_query_handles_missing_and_empty_values() {
        assert_eq!(redirect_from_query(""), None);
        assert_eq!(redirect_from_query("?redirect="), None);
        assert_eq!(redirect_from_query("?other=%2Fx"), None);
        assert_eq!(
            redirect_from_query("?a=1&redirect=%2Fchat").as_deref(),
            Some("/chat")
        );
    }
}
