use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paradigm_core::db::RepoError;
use paradigm_core::validate::ValidationError;
use serde_json::json;

/// API error type. Everything a client did wrong is a 400; a missing row is
/// a bare 404.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation failed: {0}")]
    Validation(ValidationError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { .. } => ApiError::NotFound,
            RepoError::Validation(err) => ApiError::Validation(err),
            RepoError::Constraint(msg) => ApiError::BadRequest(msg),
            RepoError::Database(err) => {
                tracing::error!("Database error: {err}");
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, data) = match self {
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg, None),
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                "validationError",
                err.to_string(),
                Some(err),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "type": error_type,
            "message": message,
            "statusCode": status.as_u16(),
        });
        if let Some(data) = data {
            error["data"] = json!(data);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;
    use uuid::Uuid;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_has_empty_body() {
        let response = ApiError::from(RepoError::NotFound {
            entity: "user",
            id: Uuid::nil(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn validation_errors_carry_field_data() {
        let response =
            ApiError::from(ValidationError::single("slug", "is a required property")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["statusCode"], 400);
        assert_eq!(body["error"]["data"]["slug"][0], "is a required property");
    }

    #[tokio::test]
    async fn constraint_violations_are_bad_requests() {
        let response = ApiError::from(RepoError::Constraint(
            "insert or update violates foreign key constraint".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "badRequest");
        assert!(body["error"].get("data").is_none());
    }

    #[tokio::test]
    async fn database_failures_collapse_to_bad_request() {
        let response = ApiError::from(RepoError::Database(sqlx::Error::PoolTimedOut)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = ApiError::Internal("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
