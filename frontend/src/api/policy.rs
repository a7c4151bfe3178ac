use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::types::{ApiError, Policy, PolicyUpdate, PolicyUpload, UploadPolicyResponse};

impl ApiClient {
    pub async fn get_policies(&self) -> Result<Vec<Policy>, ApiError> {
        let builder = self.request(Method::GET, "/policies").await;
        self.execute(builder).await
    }

    pub async fn get_policy_detail(&self, policy_id: i64) -> Result<Policy, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/policies/{}", policy_id))
            .await;
        self.execute(builder).await
    }

    pub async fn upload_policy(
        &self,
        upload: PolicyUpload,
    ) -> Result<UploadPolicyResponse, ApiError> {
        let form = Form::new()
            .text("title", upload.title)
            .text("description", upload.description)
            .text("category", upload.category)
            .part("file", Part::bytes(upload.data).file_name(upload.file_name));
        let builder = self
            .request(Method::POST, "/policies/upload")
            .await
            .multipart(form);
        self.execute(builder).await
    }

    pub async fn update_policy(
        &self,
        policy_id: i64,
        request: &PolicyUpdate,
    ) -> Result<Policy, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/policies/{}", policy_id))
            .await
            .json(request);
        self.execute(builder).await
    }

    pub async fn delete_policy(&self, policy_id: i64) -> Result<Value, ApiError> {
        let builder = self
            .request(Method::DELETE, &format!("/policies/{}", policy_id))
            .await;
        self.execute(builder).await
    }
}
