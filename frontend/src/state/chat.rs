use leptos::*;

use super::container_message;
use crate::api::{ApiClient, ApiError, ChatMessage, ChatSendRequest, ChatSendResponse};
use crate::session::{use_session, Session};

pub type ChatContext = (ReadSignal<ChatState>, WriteSignal<ChatState>);

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub loading: bool,
    pub error: Option<String>,
}

#[component]
pub fn ChatProvider(children: Children) -> impl IntoView {
    let (state, set_state) = create_signal(ChatState::default());

    // The transcript survives reloads through the session store.
    let session = use_session();
    let saved = session.chat_messages();
    if !saved.is_empty() {
        set_state.update(|s| s.messages = saved);
    }

    provide_context::<ChatContext>((state, set_state));
    view! { <>{children()}</> }
}

pub fn use_chat() -> ChatContext {
    use_context::<ChatContext>().unwrap_or_else(|| create_signal(ChatState::default()))
}

/// Appends the user's turn before the request goes out, then either the
/// assistant's turn or an error turn. The error turn is a transcript entry
/// of its own, independent of the container error field.
pub async fn send_message(
    api: &ApiClient,
    (state, set_state): ChatContext,
    user_id: i64,
    content: String,
) -> Result<ChatMessage, ApiError> {
    let user_turn = ChatMessage::user(content.clone());
    set_state.update(|s| {
        s.messages.push(user_turn);
        s.loading = true;
        s.error = None;
    });
    save_transcript(api.session(), state);

    let request = ChatSendRequest {
        user_id,
        message: content,
    };
    let outcome = match api.send_chat_message(&request).await {
        Ok(response) => {
            let reply = assistant_turn(&response);
            let stored = reply.clone();
            set_state.update(move |s| {
                s.messages.push(stored);
                s.loading = false;
            });
            Ok(reply)
        }
        Err(error) => {
            let message = container_message(&error, "Failed to send message");
            let error_turn = ChatMessage::error(message.clone());
            set_state.update(move |s| {
                s.messages.push(error_turn);
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    };
    save_transcript(api.session(), state);
    outcome
}

fn assistant_turn(response: &ChatSendResponse) -> ChatMessage {
    ChatMessage::ai(response)
}

/// Replaces the local transcript with the server-side history, oldest
/// first, one user/assistant pair per entry.
pub async fn fetch_history(
    api: &ApiClient,
    (state, set_state): ChatContext,
    user_id: i64,
) -> Result<Vec<ChatMessage>, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match api.get_chat_history(user_id).await {
        Ok(entries) => {
            let mut messages = Vec::with_capacity(entries.len() * 2);
            for entry in &entries {
                let mut user_turn = ChatMessage::user(entry.message.clone());
                if let Some(stamp) = &entry.created_at {
                    user_turn.timestamp = stamp.clone();
                }
                messages.push(user_turn);
                if let Some(response) = &entry.response {
                    let mut ai_turn = ChatMessage::ai(&ChatSendResponse {
                        response: response.clone(),
                        timestamp: entry.created_at.clone(),
                        source_documents: Vec::new(),
                    });
                    if let Some(stamp) = &entry.created_at {
                        ai_turn.timestamp = stamp.clone();
                    }
                    messages.push(ai_turn);
                }
            }
            let stored = messages.clone();
            set_state.update(move |s| {
                s.messages = stored;
                s.loading = false;
            });
            save_transcript(api.session(), state);
            Ok(messages)
        }
        Err(error) => {
            let message = container_message(&error, "Failed to load chat history");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    }
}

/// Drops the local transcript only.
pub fn clear_messages(session: &Session, set_state: WriteSignal<ChatState>) {
    set_state.update(|s| {
        s.messages.clear();
        s.error = None;
    });
    session.clear_chat_messages();
}

/// Clears the server-side history, then the local transcript.
pub async fn clear_history(
    api: &ApiClient,
    set_state: WriteSignal<ChatState>,
    user_id: i64,
) -> Result<(), ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match api.clear_chat_history(user_id).await {
        Ok(_) => {
            set_state.update(|s| {
                s.messages.clear();
                s.loading = false;
            });
            api.session().clear_chat_messages();
            Ok(())
        }
        Err(error) => {
            let message = container_message(&error, "Failed to clear chat history");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    }
}

fn save_transcript(session: &Session, state: ReadSignal<ChatState>) {
    session.save_chat_messages(&state.get_untracked().messages);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::ChatRole;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn send_appends_user_and_assistant_turns_and_persists() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/chat/send");
            then.status(200).json_body(json!({
                "response": "You have 12 days left.",
                "timestamp": "2024-05-01 09:00:00",
                "source_documents": [{ "title": "handbook" }]
            }));
        });

        let runtime = create_runtime();
        let ctx = create_signal(ChatState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let reply = send_message(&api, ctx, 7, "How many days left?".into())
            .await
            .unwrap();
        assert_eq!(reply.role, ChatRole::Ai);

        let (state, _) = ctx;
        let snapshot = state.get();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[0].role, ChatRole::User);
        assert_eq!(snapshot.messages[1].content, "You have 12 days left.");
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());

        // Both turns hit the durable transcript.
        assert_eq!(api.session().chat_messages().len(), 2);
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_send_appends_an_error_turn_and_sets_the_error_field() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/chat/send");
            then.status(500).json_body(json!({ "detail": "model offline" }));
        });

        let runtime = create_runtime();
        let ctx = create_signal(ChatState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let error = send_message(&api, ctx, 7, "hello".into()).await.unwrap_err();
        assert_eq!(error, ApiError::Server);

        let (state, _) = ctx;
        let snapshot = state.get();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[0].role, ChatRole::User);
        assert_eq!(snapshot.messages[1].role, ChatRole::Error);
        assert_eq!(snapshot.messages[1].content, "Failed to send message");
        assert_eq!(snapshot.error.as_deref(), Some("Failed to send message"));
        assert!(!snapshot.loading);

        // The optimistic user turn and the error turn are both persisted.
        assert_eq!(api.session().chat_messages().len(), 2);
        runtime.dispose();
    }

    #[tokio::test]
    async fn fetch_history_replaces_the_transcript_in_pairs() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/chat/history/7");
            then.status(200).json_body(json!([
                {
                    "id": 1,
                    "user_id": 7,
                    "message": "hi",
                    "response": "hello",
                    "created_at": "2024-05-01 09:00:00"
                },
                {
                    "id": 2,
                    "user_id": 7,
                    "message": "unanswered",
                    "response": null,
                    "created_at": "2024-05-01 09:01:00"
                }
            ]));
        });

        let runtime = create_runtime();
        let ctx = create_signal(ChatState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let messages = fetch_history(&api, ctx, 7).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Ai);
        assert_eq!(messages[1].timestamp, "2024-05-01 09:00:00");
        assert_eq!(messages[2].role, ChatRole::User);
        runtime.dispose();
    }

    #[tokio::test]
    async fn clear_messages_drops_state_and_durable_transcript() {
        let runtime = create_runtime();
        let (state, set_state) = create_signal(ChatState::default());
        let session = Session::in_memory();

        set_state.update(|s| s.messages.push(ChatMessage::user("hi")));
        session.save_chat_messages(&state.get().messages);

        clear_messages(&session, set_state);

        assert!(state.get().messages.is_empty());
        assert!(session.chat_messages().is_empty());
        runtime.dispose();
    }

    #[tokio::test]
    async fn clear_history_clears_server_then_local() {
        let server = MockServer::start_async().await;
        let clear_mock = server.mock(|when, then| {
            when.method(POST).path("/api/chat/history/7/clear");
            then.status(200).json_body(json!({ "message": "cleared" }));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(ChatState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));
        set_state.update(|s| s.messages.push(ChatMessage::user("hi")));

        clear_history(&api, set_state, 7).await.unwrap();
        assert_eq!(clear_mock.hits_async().await, 1);
        assert!(state.get().messages.is_empty());
        runtime.dispose();
    }
}
