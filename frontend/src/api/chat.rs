use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::types::{ApiError, ChatHistoryEntry, ChatSendRequest, ChatSendResponse};

impl ApiClient {
    pub async fn send_chat_message(
        &self,
        request: &ChatSendRequest,
    ) -> Result<ChatSendResponse, ApiError> {
        let builder = self.request(Method::POST, "/chat/send").await.json(request);
        self.execute(builder).await
    }

    pub async fn get_chat_history(&self, user_id: i64) -> Result<Vec<ChatHistoryEntry>, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/chat/history/{}", user_id))
            .await;
        self.execute(builder).await
    }

    pub async fn clear_chat_history(&self, user_id: i64) -> Result<Value, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/chat/history/{}/clear", user_id))
            .await;
        self.execute(builder).await
    }
}
