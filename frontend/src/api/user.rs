use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::types::{
    AnnualLeaveInfo, ApiError, ChangePasswordRequest, LeaveStats, LoginRequest, LoginResponse,
    UpdateUserRequest, UserResponse,
};

impl ApiClient {
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let builder = self.request(Method::POST, "/auth/login").await.json(request);
        self.execute(builder).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<UserResponse, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/users/{}", user_id))
            .await;
        self.execute(builder).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        request: &UpdateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/users/{}", user_id))
            .await
            .json(request);
        self.execute(builder).await
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        request: &ChangePasswordRequest,
    ) -> Result<Value, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/users/{}/change-password", user_id))
            .await
            .json(request);
        self.execute(builder).await
    }

    pub async fn get_leave_stats(&self, user_id: i64) -> Result<LeaveStats, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/users/{}/leave-stats", user_id))
            .await;
        self.execute(builder).await
    }

    pub async fn get_annual_leave(&self, user_id: i64) -> Result<AnnualLeaveInfo, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/users/{}/annual-leave", user_id))
            .await;
        self.execute(builder).await
    }
}
