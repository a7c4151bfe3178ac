use std::rc::Rc;

use leptos::*;

use crate::api::types::{ChatMessage, UserInfo};
use crate::config::storage_keys;
use crate::utils::storage::{MemoryStore, SessionStore};

/// The authenticated-identity context: token, persisted profile and the
/// chat transcript, all backed by one `SessionStore`. Created at app start,
/// populated at login, cleared at logout or authentication expiry. Handed
/// around explicitly (Leptos context, `ApiClient` field) instead of being
/// read from ambient globals.
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn SessionStore>,
}

impl Session {
    /// Browser-backed session; falls back to an in-memory store when
    /// `localStorage` is unavailable (private mode, host builds).
    pub fn from_browser() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            match crate::utils::storage::BrowserStore::open() {
                Ok(store) => {
                    return Self {
                        store: Rc::new(store),
                    }
                }
                Err(error) => {
                    log::warn!("localStorage unavailable, session will not survive reloads: {error}");
                }
            }
        }
        Self::in_memory()
    }

    pub fn in_memory() -> Self {
        Self {
            store: Rc::new(MemoryStore::default()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(storage_keys::TOKEN)
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(storage_keys::TOKEN, token);
    }

    pub fn user(&self) -> Option<UserInfo> {
        let raw = self.store.get(storage_keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                log::warn!("discarding corrupt persisted user record: {error}");
                None
            }
        }
    }

    pub fn set_user(&self, user: &UserInfo) {
        match serde_json::to_string(user) {
            Ok(raw) => self.store.set(storage_keys::USER, &raw),
            Err(error) => log::warn!("failed to persist user record: {error}"),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Admin only when the persisted record says so; a missing or corrupt
    /// record never grants access.
    pub fn is_admin(&self) -> bool {
        self.user().map(|user| user.profile.is_admin).unwrap_or(false)
    }

    /// Drops the credential and profile. The chat transcript is cleared
    /// separately by its own user action.
    pub fn clear(&self) {
        self.store.remove(storage_keys::TOKEN);
        self.store.remove(storage_keys::USER);
    }

    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        let Some(raw) = self.store.get(storage_keys::CHAT_TRANSCRIPT) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(messages) => messages,
            Err(error) => {
                log::warn!("discarding corrupt chat transcript: {error}");
                Vec::new()
            }
        }
    }

    pub fn save_chat_messages(&self, messages: &[ChatMessage]) {
        match serde_json::to_string(messages) {
            Ok(raw) => self.store.set(storage_keys::CHAT_TRANSCRIPT, &raw),
            Err(error) => log::warn!("failed to persist chat transcript: {error}"),
        }
    }

    pub fn clear_chat_messages(&self) {
        self.store.remove(storage_keys::CHAT_TRANSCRIPT);
    }
}

pub fn use_session() -> Session {
    use_context::<Session>().unwrap_or_else(Session::from_browser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ChatMessage, UserResponse};

    fn sample_user(is_admin: bool) -> UserInfo {
        UserInfo {
            profile: UserResponse {
                id: 7,
                username: "alice".into(),
                email: None,
                full_name: Some("Alice Example".into()),
                department: Some("Engineering".into()),
                position: None,
                employee_id: None,
                hire_date: None,
                is_active: true,
                is_admin,
            },
            annual_leave: None,
        }
    }

    #[test]
    fn token_round_trip_and_clear() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.set_token("tok-1");
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok-1"));

        session.set_user(&sample_user(false));
        session.clear();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn persisted_user_round_trips() {
        let session = Session::in_memory();
        let user = sample_user(true);
        session.set_user(&user);
        assert_eq!(session.user(), Some(user));
        assert!(session.is_admin());
    }

    #[test]
    fn corrupt_user_record_reads_as_absent() {
        let session = Session::in_memory();
        session
            .store
            .set(storage_keys::USER, "{not valid json");
        assert!(session.user().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn admin_flag_must_be_exactly_true() {
        let session = Session::in_memory();
        assert!(!session.is_admin());

        session.set_user(&sample_user(false));
        assert!(!session.is_admin());

        session.set_user(&sample_user(true));
        assert!(session.is_admin());
    }

    #[test]
    fn chat_transcript_round_trips_and_clears() {
        let session = Session::in_memory();
        assert!(session.chat_messages().is_empty());

        let messages = vec![ChatMessage::user("hello"), ChatMessage::error("failed")];
        session.save_chat_messages(&messages);
        assert_eq!(session.chat_messages(), messages);

        session.clear_chat_messages();
        assert!(session.chat_messages().is_empty());
    }

    #[test]
    fn clearing_credentials_keeps_the_transcript() {
        let session = Session::in_memory();
        session.set_token("tok");
        session.save_chat_messages(&[ChatMessage::user("hi")]);

        session.clear();
        assert_eq!(session.chat_messages().len(), 1);
    }
}
