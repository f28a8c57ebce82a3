use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Failure taxonomy for the HTTP surface. Every variant renders as the
/// `{"errors": [...]}` envelope the API speaks.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("invalid request")]
    Validation(Vec<String>),

    /// Email already registered.
    #[error("email already taken")]
    Duplicate,

    /// Bad credentials, missing/expired/invalid token, or unknown user.
    #[error("unauthorized")]
    Auth(Vec<String>),

    /// Unknown or foreign-owned resource id.
    #[error("not found")]
    NotFound,

    /// Underlying save failure; echoes the attempted record back.
    #[error("record could not be saved")]
    Save(Vec<Value>),

    /// Anything the caller cannot act on. Logged, body sanitized.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(vec![msg.into()])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors): (StatusCode, Vec<Value>) = match self {
            AppError::Validation(msgs) => (
                StatusCode::BAD_REQUEST,
                msgs.into_iter().map(Value::String).collect(),
            ),
            AppError::Duplicate => (
                StatusCode::BAD_REQUEST,
                vec![Value::String("Email already taken".into())],
            ),
            AppError::Auth(msgs) => (
                StatusCode::UNAUTHORIZED,
                msgs.into_iter().map(Value::String).collect(),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                vec![Value::String("Not Found".into())],
            ),
            AppError::Save(records) => (StatusCode::BAD_REQUEST, records),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![Value::String("Internal server error".into())],
                )
            }
        };

        (status, Json(json!({ "errors": errors }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn validation_renders_400_with_all_messages() {
        let err = AppError::Validation(vec![
            "Email is required".to_string(),
            "Password is required".to_string(),
        ]);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(
            body["errors"],
            json!(["Email is required", "Password is required"])
        );
    }

    #[tokio::test]
    async fn duplicate_renders_400_email_taken() {
        let resp = AppError::Duplicate.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["errors"], json!(["Email already taken"]));
    }

    #[tokio::test]
    async fn auth_renders_401() {
        let resp = AppError::auth("Invalid login").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["errors"], json!(["Invalid login"]));
    }

    #[tokio::test]
    async fn not_found_renders_404() {
        let resp = AppError::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["errors"], json!(["Not Found"]));
    }

    #[tokio::test]
    async fn save_echoes_attempted_record() {
        let record = json!({ "url": "http://example.com", "user": "abc" });
        let resp = AppError::Save(vec![record.clone()]).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["errors"], json!([record]));
    }

    #[tokio::test]
    async fn internal_renders_500_without_detail() {
        let resp = AppError::Internal("secret detail".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["errors"], json!(["Internal server error"]));
    }
}
