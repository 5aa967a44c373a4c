//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vocab_core::{CoreError, SessionError, WorkspaceEvent};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<WorkspaceEvent>,
}

impl ApiError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
        }
    }

    /// Attach workspace events drained while the request failed.
    pub fn with_events(self, events: Vec<WorkspaceEvent>) -> ApiErrorWithEvents {
        ApiErrorWithEvents {
            error: self,
            events,
        }
    }

    fn into_response_with(self, events: Vec<WorkspaceEvent>) -> Response {
        let (status, error_type) = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            events,
        });

        (status, body).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(Vec::new())
    }
}

/// An error whose body also carries the events the failed operation emitted.
#[derive(Debug)]
pub struct ApiErrorWithEvents {
    error: ApiError,
    events: Vec<WorkspaceEvent>,
}

impl From<ApiError> for ApiErrorWithEvents {
    fn from(error: ApiError) -> Self {
        error.with_events(Vec::new())
    }
}

impl IntoResponse for ApiErrorWithEvents {
    fn into_response(self) -> Response {
        self.error.into_response_with(self.events)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthRequired => ApiError::Unauthorized(err.to_string()),
            CoreError::NotFound { .. } => ApiError::NotFound(err.user_message().to_string()),
            CoreError::LookupFailed(ref detail) => {
                tracing::warn!(%detail, "dictionary lookup failed");
                ApiError::Upstream(err.user_message().to_string())
            }
            CoreError::RemoteFailure(message) => ApiError::Upstream(message),
            CoreError::InvalidInput(message) => ApiError::BadRequest(message),
            CoreError::Discarded => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyCollection => ApiError::BadRequest(err.to_string()),
            SessionError::NotStarted | SessionError::Closed => ApiError::Conflict(err.to_string()),
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_status() {
        let error = ApiError::Unauthorized("invalid token".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_conflict_status() {
        let error = ApiError::Conflict("drill closed".to_string());
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upstream_status() {
        let error = ApiError::Upstream("gateway down".to_string());
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_core_errors_map_to_statuses() {
        let cases = [
            (CoreError::AuthRequired, StatusCode::UNAUTHORIZED),
            (
                CoreError::NotFound {
                    word: "zzz".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                CoreError::LookupFailed("timeout".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CoreError::RemoteFailure("500".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CoreError::InvalidInput("empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::Discarded, StatusCode::CONFLICT),
        ];

        for (core, status) in cases {
            assert_eq!(ApiError::from(core).into_response().status(), status);
        }
    }

    #[test]
    fn test_not_found_uses_banner_text() {
        let error = ApiError::from(CoreError::NotFound {
            word: "zzz".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Not found: Word not found. Please try another word."
        );
    }

    #[test]
    fn test_session_errors_map_to_statuses() {
        let cases = [
            (SessionError::EmptyCollection, StatusCode::BAD_REQUEST),
            (SessionError::NotStarted, StatusCode::CONFLICT),
            (SessionError::Closed, StatusCode::CONFLICT),
        ];

        for (session, status) in cases {
            assert_eq!(ApiError::from(session).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_body_carries_events() {
        let events = vec![WorkspaceEvent::LookupFailed {
            message: "Failed to look up word. Please try again.".to_string(),
        }];
        let response = ApiError::Upstream("down".to_string())
            .with_events(events)
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["events"][0]["type"], "lookup_failed");
    }

    #[tokio::test]
    async fn test_error_body_omits_empty_events() {
        let response = ApiError::NotFound("gone".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("events").is_none());
    }

    #[test]
    fn test_error_display_bad_request() {
        let error = ApiError::BadRequest("missing field".to_string());
        assert_eq!(error.to_string(), "Bad request: missing field");
    }
}
