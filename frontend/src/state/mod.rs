pub mod chat;
pub mod leave;
pub mod policy;
pub mod user;

use crate::api::ApiError;

/// The string a container stores for a failed action: the server-supplied
/// detail when there is one, else the action's fixed fallback.
pub(crate) fn container_message(error: &ApiError, fallback: &str) -> String {
    error
        .server_detail()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_message_prefers_the_server_detail() {
        let error = ApiError::from_status(400, Some("quota exceeded".into()));
        assert_eq!(container_message(&error, "Failed to apply"), "quota exceeded");
    }

    #[test]
    fn container_message_falls_back_per_action() {
        assert_eq!(
            container_message(&ApiError::Unauthorized, "Failed to apply"),
            "Failed to apply"
        );
        assert_eq!(
            container_message(&ApiError::Network("refused".into()), "Failed to load"),
            "Failed to load"
        );
    }
}
