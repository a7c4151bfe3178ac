use std::rc::Rc;

use leptos::*;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::types::{ApiError, ErrorBody};
use crate::{config, notify::Notifier, session::Session};

/// One configured HTTP client for the whole app: base URL resolution,
/// bearer-token attachment, the status-to-error mapping and its side
/// effects (transient notice on every failure, session teardown plus a
/// delayed login redirect on 401). Callers get the unwrapped typed body or
/// an `ApiError`; they never see the transport envelope.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    session: Session,
    notifier: Notifier,
    on_session_expired: Rc<dyn Fn()>,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_session(Session::from_browser())
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            client: build_http_client(),
            base_url: None,
            session,
            notifier: Notifier::default(),
            on_session_expired: Rc::new(schedule_login_redirect),
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        let mut client = Self::new();
        client.base_url = Some(base_url.into());
        client
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the 401 follow-up. Tests use this to observe that a login
    /// navigation was scheduled.
    pub fn with_session_expired_hook(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_session_expired = Rc::new(hook);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(base) => base.clone(),
            None => config::await_api_base_url().await,
        }
    }

    pub(crate) async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let base_url = self.resolved_base_url().await;
        let mut builder = self.client.request(method, format!("{}{}", base_url, path));
        if let Some(token) = self.session.token() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|error| self.fail(ApiError::Network(error.to_string())))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|error| self.fail(ApiError::Decode(error.to_string())))
        } else {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail);
            Err(self.fail(ApiError::from_status(status.as_u16(), detail)))
        }
    }

    /// Every failure passes through here exactly once: notify the user,
    /// run the 401 teardown, hand the error back to the caller.
    fn fail(&self, error: ApiError) -> ApiError {
        log::warn!("request failed: {error}");
        self.notifier.notify(error.to_string());
        if error == ApiError::Unauthorized {
            self.session.clear();
            (self.on_session_expired)();
        }
        error
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(ApiClient::new)
}

fn build_http_client() -> Client {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Client::builder()
            .timeout(config::REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default()
    }
    #[cfg(target_arch = "wasm32")]
    {
        Client::new()
    }
}

/// Concurrent 401s each schedule their own redirect; the extra navigations
/// are idempotent.
fn schedule_login_redirect() {
    #[cfg(target_arch = "wasm32")]
    {
        gloo_timers::callback::Timeout::new(config::LOGIN_REDIRECT_DELAY_MS, || {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/login");
            }
        })
        .forget();
    }
}
