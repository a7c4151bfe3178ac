use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::utils::datetime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub hire_date: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualLeaveInfo {
    pub total_days: f64,
    pub used_days: f64,
    pub remaining_days: f64,
}

/// Profile plus annual-leave quota, merged after login and persisted in the
/// session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(flatten)]
    pub profile: UserResponse,
    #[serde(default)]
    pub annual_leave: Option<AnnualLeaveInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveStats {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub pending: i64,
    #[serde(default)]
    pub approved: i64,
    #[serde(default)]
    pub rejected: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_days: Option<i64>,
    #[serde(default)]
    pub need_approval: bool,
    #[serde(default)]
    pub is_paid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending approval",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
            LeaveStatus::Cancelled => "Cancelled",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "#1989fa",
            LeaveStatus::Approved => "#07c160",
            LeaveStatus::Rejected => "#ee0a24",
            LeaveStatus::Cancelled => "#969799",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub user_id: i64,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyLeaveRequest {
    pub user_id: i64,
    pub leave_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedLeave {
    pub id: i64,
    pub user_id: i64,
    pub leave_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    pub reason: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The submission envelope carries a plain-string `status`; the list
/// refresh keys off the literal `"success"` value, so it is deliberately
/// not an enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyLeaveResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub leave_request: Option<AppliedLeave>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeavePlan {
    pub plan_name: String,
    pub leave_type: String,
    pub days: f64,
    #[serde(default)]
    pub is_compliant: bool,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub recommendation_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedLeaveWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<LeavePlan>,
    #[serde(default)]
    pub leave_request: Option<RequestedLeaveWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveLeaveRequest {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Client-side form data for the multipart policy upload.
#[derive(Debug, Clone)]
pub struct PolicyUpload {
    pub title: String,
    pub description: String,
    pub category: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicyResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub policy: Option<Policy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSendRequest {
    pub user_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSendResponse {
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source_documents: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub source_documents: Vec<Value>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: ChatRole::User,
            content: content.into(),
            timestamp: datetime::current_timestamp(),
            source_documents: Vec::new(),
        }
    }

    pub fn ai(response: &ChatSendResponse) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: ChatRole::Ai,
            content: response.response.clone(),
            timestamp: response
                .timestamp
                .clone()
                .unwrap_or_else(datetime::current_timestamp),
            source_documents: response.source_documents.clone(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: ChatRole::Error,
            content: message.into(),
            timestamp: datetime::current_timestamp(),
            source_documents: Vec::new(),
        }
    }
}

/// FastAPI-style error envelope. A non-string `detail` (validation lists)
/// fails to parse and falls back to the per-status message.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{}", detail.as_deref().unwrap_or("Invalid request parameters"))]
    BadRequest { detail: Option<String> },
    #[error("Your session has expired, please log in again")]
    Unauthorized,
    #[error("You do not have permission to perform this action")]
    Forbidden,
    #[error("The requested resource was not found")]
    NotFound,
    #[error("Server error, please try again later")]
    Server,
    #[error("{}", detail.as_deref().unwrap_or("Request failed"))]
    Status { code: u16, detail: Option<String> },
    #[error("Network error, please check your connection")]
    Network(String),
    #[error("Received an invalid response from the server")]
    Decode(String),
    #[error("Browser storage is unavailable")]
    Storage(String),
}

impl ApiError {
    pub fn from_status(code: u16, detail: Option<String>) -> Self {
        match code {
            400 => ApiError::BadRequest { detail },
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500 => ApiError::Server,
            code => ApiError::Status { code, detail },
        }
    }

    /// The server-supplied detail string, when this failure carried one.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { detail } | ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
