use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use super::types::{
    ApiError, ApplyLeaveRequest, ApplyLeaveResponse, ApproveLeaveRequest, LeaveRequest, LeaveType,
    RecommendationRequest, RecommendationResponse,
};

impl ApiClient {
    pub async fn get_leave_types(&self) -> Result<Vec<LeaveType>, ApiError> {
        let builder = self.request(Method::GET, "/leaves/types").await;
        self.execute(builder).await
    }

    pub async fn get_leave_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, ApiError> {
        let builder = self
            .request(Method::POST, "/leaves/recommendations")
            .await
            .json(request);
        self.execute(builder).await
    }

    pub async fn apply_leave(
        &self,
        request: &ApplyLeaveRequest,
    ) -> Result<ApplyLeaveResponse, ApiError> {
        let builder = self.request(Method::POST, "/leaves/apply").await.json(request);
        self.execute(builder).await
    }

    pub async fn get_leave_requests(&self, user_id: i64) -> Result<Vec<LeaveRequest>, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/leaves/user/{}", user_id))
            .await;
        self.execute(builder).await
    }

    pub async fn get_leave_detail(&self, leave_id: i64) -> Result<LeaveRequest, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/leaves/{}", leave_id))
            .await;
        self.execute(builder).await
    }

    pub async fn cancel_leave(&self, leave_id: i64) -> Result<Value, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/leaves/{}/cancel", leave_id))
            .await;
        self.execute(builder).await
    }

    pub async fn approve_leave(
        &self,
        leave_id: i64,
        request: &ApproveLeaveRequest,
    ) -> Result<Value, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/leaves/{}/approve", leave_id))
            .await
            .json(request);
        self.execute(builder).await
    }
}
