use leptos::*;

use super::container_message;
use crate::api::{
    ApiClient, ApiError, ApplyLeaveRequest, ApplyLeaveResponse, ApproveLeaveRequest, LeaveRequest,
    LeaveType, RecommendationRequest, RecommendationResponse,
};

pub type LeaveContext = (ReadSignal<LeaveState>, WriteSignal<LeaveState>);

#[derive(Debug, Clone, Default)]
pub struct LeaveState {
    pub leave_types: Vec<LeaveType>,
    pub requests: Vec<LeaveRequest>,
    pub recommendation: Option<RecommendationResponse>,
    pub current: Option<LeaveRequest>,
    pub loading: bool,
    pub error: Option<String>,
}

#[component]
pub fn LeaveProvider(children: Children) -> impl IntoView {
    let ctx = create_signal(LeaveState::default());
    provide_context::<LeaveContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_leave() -> LeaveContext {
    use_context::<LeaveContext>().unwrap_or_else(|| create_signal(LeaveState::default()))
}

/// Leave types change rarely; the first successful fetch is cached for the
/// rest of the session.
pub async fn fetch_leave_types(
    api: &ApiClient,
    (state, set_state): LeaveContext,
) -> Result<Vec<LeaveType>, ApiError> {
    let cached = state.get_untracked().leave_types;
    if !cached.is_empty() {
        return Ok(cached);
    }

    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = api.get_leave_types().await;
    match &result {
        Ok(types) => {
            let types = types.clone();
            set_state.update(move |s| {
                s.leave_types = types;
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to load leave types");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

pub async fn fetch_recommendations(
    api: &ApiClient,
    set_state: WriteSignal<LeaveState>,
    request: RecommendationRequest,
) -> Result<RecommendationResponse, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
        s.recommendation = None;
    });

    let result = api.get_leave_recommendations(&request).await;
    match &result {
        Ok(recommendation) => {
            let recommendation = recommendation.clone();
            set_state.update(move |s| {
                s.recommendation = Some(recommendation);
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to load leave recommendations");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

/// The follow-up list refresh happens only when the backend body says
/// `"success"` verbatim; on any other value the list is left stale.
pub async fn apply_leave(
    api: &ApiClient,
    set_state: WriteSignal<LeaveState>,
    request: ApplyLeaveRequest,
) -> Result<ApplyLeaveResponse, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let user_id = request.user_id;
    let result = api.apply_leave(&request).await;
    match &result {
        Ok(response) => {
            set_state.update(|s| s.loading = false);
            if response.status == "success" {
                let _ = fetch_leave_requests(api, set_state, user_id).await;
            }
        }
        Err(error) => {
            let message = container_message(error, "Failed to submit leave request");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

pub async fn fetch_leave_requests(
    api: &ApiClient,
    set_state: WriteSignal<LeaveState>,
    user_id: i64,
) -> Result<Vec<LeaveRequest>, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = api.get_leave_requests(user_id).await;
    match &result {
        Ok(requests) => {
            let requests = requests.clone();
            set_state.update(move |s| {
                s.requests = requests;
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to load leave requests");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

pub async fn fetch_leave_detail(
    api: &ApiClient,
    set_state: WriteSignal<LeaveState>,
    leave_id: i64,
) -> Result<LeaveRequest, ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    let result = api.get_leave_detail(leave_id).await;
    match &result {
        Ok(detail) => {
            let detail = detail.clone();
            set_state.update(move |s| {
                s.current = Some(detail);
                s.loading = false;
            });
        }
        Err(error) => {
            let message = container_message(error, "Failed to load leave details");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
        }
    }
    result
}

/// The backend owns the state transition; the client just re-fetches.
pub async fn cancel_leave(
    api: &ApiClient,
    set_state: WriteSignal<LeaveState>,
    leave_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match api.cancel_leave(leave_id).await {
        Ok(_) => {
            set_state.update(|s| s.loading = false);
            fetch_leave_requests(api, set_state, user_id).await?;
            Ok(())
        }
        Err(error) => {
            let message = container_message(&error, "Failed to cancel leave request");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    }
}

pub async fn approve_leave(
    api: &ApiClient,
    set_state: WriteSignal<LeaveState>,
    leave_id: i64,
    user_id: i64,
    request: ApproveLeaveRequest,
) -> Result<(), ApiError> {
    set_state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    match api.approve_leave(leave_id, &request).await {
        Ok(_) => {
            set_state.update(|s| s.loading = false);
            fetch_leave_requests(api, set_state, user_id).await?;
            Ok(())
        }
        Err(error) => {
            let message = container_message(&error, "Failed to submit the approval decision");
            set_state.update(move |s| {
                s.error = Some(message);
                s.loading = false;
            });
            Err(error)
        }
    }
}

pub fn clear_recommendation(set_state: WriteSignal<LeaveState>) {
    set_state.update(|s| s.recommendation = None);
}

pub fn clear_current(set_state: WriteSignal<LeaveState>) {
    set_state.update(|s| s.current = None);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request_row(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": 7,
            "leave_type": "Annual leave",
            "start_date": "2024-05-01",
            "end_date": "2024-05-02",
            "days": 2.0,
            "reason": "trip",
            "status": "pending",
            "created_at": "2024-04-28 10:00:00"
        })
    }

    fn apply_request() -> ApplyLeaveRequest {
        ApplyLeaveRequest {
            user_id: 7,
            leave_type_id: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            reason: "trip".into(),
            ai_recommendation: None,
        }
    }

    #[tokio::test]
    async fn leave_types_are_fetched_once_and_cached() {
        let server = MockServer::start_async().await;
        let types_mock = server.mock(|when, then| {
            when.method(GET).path("/api/leaves/types");
            then.status(200).json_body(json!([{
                "id": 1,
                "name": "Annual leave",
                "need_approval": true,
                "is_paid": true
            }]));
        });

        let runtime = create_runtime();
        let ctx = create_signal(LeaveState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let first = fetch_leave_types(&api, ctx).await.unwrap();
        let second = fetch_leave_types(&api, ctx).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(types_mock.hits_async().await, 1);
        runtime.dispose();
    }

    #[tokio::test]
    async fn successful_apply_refreshes_the_request_list() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/leaves/apply");
            then.status(200)
                .json_body(json!({ "status": "success", "message": "submitted" }));
        });
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/api/leaves/user/7");
            then.status(200).json_body(json!([request_row(31)]));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(LeaveState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let response = apply_leave(&api, set_state, apply_request()).await.unwrap();
        assert_eq!(response.status, "success");
        assert_eq!(list_mock.hits_async().await, 1);

        let snapshot = state.get();
        assert_eq!(snapshot.requests.len(), 1);
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        runtime.dispose();
    }

    #[tokio::test]
    async fn non_success_status_leaves_the_list_stale() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/leaves/apply");
            then.status(200)
                .json_body(json!({ "status": "queued", "message": "pending review" }));
        });
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/api/leaves/user/7");
            then.status(200).json_body(json!([request_row(31)]));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(LeaveState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let response = apply_leave(&api, set_state, apply_request()).await.unwrap();
        assert_eq!(response.status, "queued");
        assert_eq!(list_mock.hits_async().await, 0);
        assert!(state.get().requests.is_empty());
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_apply_stores_detail_and_releases_loading() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/leaves/apply");
            then.status(400)
                .json_body(json!({ "detail": "no quota left" }));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(LeaveState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let error = apply_leave(&api, set_state, apply_request())
            .await
            .unwrap_err();
        assert_eq!(error.server_detail(), Some("no quota left"));

        let snapshot = state.get();
        assert_eq!(snapshot.error.as_deref(), Some("no quota left"));
        assert!(!snapshot.loading);
        runtime.dispose();
    }

    #[tokio::test]
    async fn cancel_refetches_the_list_after_the_backend_transition() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/leaves/31/cancel");
            then.status(200).json_body(json!({ "message": "cancelled" }));
        });
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/api/leaves/user/7");
            then.status(200).json_body(json!([]));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(LeaveState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"));

        cancel_leave(&api, set_state, 31, 7).await.unwrap();
        assert_eq!(list_mock.hits_async().await, 1);
        assert!(!state.get().loading);
        runtime.dispose();
    }

    #[tokio::test]
    async fn recommendation_failure_clears_the_previous_plan() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/leaves/recommendations");
            then.status(500).json_body(json!({ "detail": "engine down" }));
        });

        let runtime = create_runtime();
        let (state, set_state) = create_signal(LeaveState::default());
        set_state.update(|s| {
            s.recommendation = Some(RecommendationResponse {
                recommendations: Vec::new(),
                leave_request: None,
            })
        });
        let api = ApiClient::new_with_base_url(server.url("/api"));

        let request = RecommendationRequest {
            user_id: 7,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            reason: "trip".into(),
        };
        let error = fetch_recommendations(&api, set_state, request)
            .await
            .unwrap_err();
        assert_eq!(error, ApiError::Server);

        let snapshot = state.get();
        assert!(snapshot.recommendation.is_none());
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Failed to load leave recommendations")
        );
        runtime.dispose();
    }
}
