use leptos::ev::SubmitEvent;
use leptos::*;

use crate::api::{use_api, ChatMessage, ChatRole};
use crate::components::error::ErrorBanner;
use crate::session::use_session;
use crate::state::chat::{self, use_chat};
use crate::state::user::use_user;

#[component]
pub fn ChatPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let chat_ctx = use_chat();
    let (chat_state, set_chat_state) = chat_ctx;
    let (user_state, _) = use_user();
    let (draft, set_draft) = create_signal(String::new());

    let send_action = {
        let api = api.clone();
        create_action(move |content: &String| {
            let api = api.clone();
            let content = content.clone();
            async move {
                match user_state.get_untracked().user.map(|user| user.profile.id) {
                    Some(user_id) => chat::send_message(&api, chat_ctx, user_id, content)
                        .await
                        .map(|_| ()),
                    // The route guard keeps unauthenticated users out.
                    None => Ok(()),
                }
            }
        })
    };
    let pending = send_action.pending();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let content = draft.get_untracked();
        if content.trim().is_empty() || pending.get_untracked() {
            return;
        }
        set_draft.set(String::new());
        send_action.dispatch(content);
    };

    let sync_action = {
        let api = api.clone();
        create_action(move |_: &()| {
            let api = api.clone();
            async move {
                match user_state.get_untracked().user.map(|user| user.profile.id) {
                    Some(user_id) => chat::fetch_history(&api, chat_ctx, user_id)
                        .await
                        .map(|_| ()),
                    None => Ok(()),
                }
            }
        })
    };

    // Clears the server-side history when signed in; the local transcript
    // is dropped either way.
    let clear_action = {
        let api = api.clone();
        let session = session.clone();
        create_action(move |_: &()| {
            let api = api.clone();
            let session = session.clone();
            async move {
                match user_state.get_untracked().user.map(|user| user.profile.id) {
                    Some(user_id) => chat::clear_history(&api, set_chat_state, user_id).await,
                    None => {
                        chat::clear_messages(&session, set_chat_state);
                        Ok(())
                    }
                }
            }
        })
    };

    view! {
        <section class="page chat-page">
            <h1>"Leave assistant"</h1>
            <div class="chat-messages">
                <For
                    each=move || chat_state.get().messages
                    key=|message| message.id.clone()
                    children=move |message: ChatMessage| {
                        let class = match message.role {
                            ChatRole::User => "chat-message user",
                            ChatRole::Ai => "chat-message ai",
                            ChatRole::Error => "chat-message error",
                        };
                        view! {
                            <div class=class>
                                <span class="timestamp">{message.timestamp.clone()}</span>
                                <p>{message.content.clone()}</p>
                            </div>
                        }
                    }
                />
                <Show when=move || chat_state.get().loading fallback=|| ()>
                    <p class="chat-pending">"Thinking..."</p>
                </Show>
            </div>
            <ErrorBanner message=Signal::derive(move || chat_state.get().error)/>
            <form class="chat-input" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Ask about leave, quotas or policies"
                    prop:value=draft
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || pending.get()>"Send"</button>
            </form>
            <div class="chat-actions">
                <button class="link-button" on:click=move |_| sync_action.dispatch(())>
                    "Sync history"
                </button>
                <button class="link-button" on:click=move |_| clear_action.dispatch(())>
                    "Clear conversation"
                </button>
            </div>
        </section>
    }
}
