use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

/// Applied to the HTTP client on native builds; the browser transport
/// governs on wasm.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay between an authentication-expiry notice and the login redirect.
pub const LOGIN_REDIRECT_DELAY_MS: u32 = 1_500;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub mod storage_keys {
    pub const TOKEN: &str = "access_token";
    pub const USER: &str = "current_user";
    pub const CHAT_TRANSCRIPT: &str = "chat_messages";
}

/// Category values accepted by the policy upload endpoint, with labels.
pub const POLICY_CATEGORIES: &[(&str, &str)] = &[
    ("leave", "Leave policy"),
    ("attendance", "Attendance policy"),
    ("overtime", "Overtime and time off in lieu"),
    ("salary", "Compensation and benefits"),
    ("other", "Other"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
}

static API_BASE_URL: OnceLock<String> = OnceLock::new();

fn cache_base_url(value: &str) -> String {
    let value = value.to_string();
    let _ = API_BASE_URL.set(value.clone());
    value
}

#[cfg(target_arch = "wasm32")]
fn get_from_env_js() -> Option<String> {
    // Expect optional global object: window.__LEAVEDESK_ENV = { API_BASE_URL: "..." }
    let window = web_sys::window()?;
    let any = js_sys::Reflect::get(&window, &"__LEAVEDESK_ENV".into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    let obj = js_sys::Object::from(any);
    let val = js_sys::Reflect::get(&obj, &"API_BASE_URL".into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .or_else(|| js_sys::Reflect::get(&obj, &"api_base_url".into()).ok());
    val.and_then(|v| v.as_string())
}

#[cfg(target_arch = "wasm32")]
fn get_from_window_config() -> Option<String> {
    // Expect optional global object: window.__LEAVEDESK_CONFIG = { api_base_url: "..." }
    let window = web_sys::window()?;
    let any = js_sys::Reflect::get(&window, &"__LEAVEDESK_CONFIG".into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    let obj = js_sys::Object::from(any);
    let val = js_sys::Reflect::get(&obj, &"api_base_url".into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .or_else(|| js_sys::Reflect::get(&obj, &"API_BASE_URL".into()).ok());
    val.and_then(|v| v.as_string())
}

#[cfg(target_arch = "wasm32")]
fn snapshot_from_globals() -> Option<String> {
    if let Some(env_url) = get_from_env_js() {
        return Some(env_url);
    }
    get_from_window_config()
}

#[cfg(target_arch = "wasm32")]
fn write_window_config(config: &RuntimeConfig) {
    let Some(url) = &config.api_base_url else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &obj,
        &"api_base_url".into(),
        &wasm_bindgen::JsValue::from_str(url),
    );
    let _ = js_sys::Reflect::set(&window, &"__LEAVEDESK_CONFIG".into(), &obj);
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let response = reqwest::get("./config.json").await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.json::<RuntimeConfig>().await.ok()
}

pub async fn await_api_base_url() -> String {
    if let Some(cached) = API_BASE_URL.get() {
        return cached.clone();
    }
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(existing) = snapshot_from_globals() {
            return cache_base_url(&existing);
        }
        if let Some(config) = fetch_runtime_config().await {
            write_window_config(&config);
            if let Some(url) = config.api_base_url {
                return cache_base_url(&url);
            }
        }
    }
    cache_base_url(DEFAULT_API_BASE_URL)
}

pub async fn init() {
    let _ = await_api_base_url().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_category_values_are_unique() {
        let mut values: Vec<&str> = POLICY_CATEGORIES.iter().map(|(value, _)| *value).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), POLICY_CATEGORIES.len());
    }

    #[test]
    fn storage_keys_are_distinct() {
        assert_ne!(storage_keys::TOKEN, storage_keys::USER);
        assert_ne!(storage_keys::USER, storage_keys::CHAT_TRANSCRIPT);
    }

    #[test]
    fn runtime_config_parses_config_json_document() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{ "api_base_url": "https://hr.example.com/api" }"#).unwrap();
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("https://hr.example.com/api")
        );

        let empty: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert!(empty.api_base_url.is_none());
    }
}
