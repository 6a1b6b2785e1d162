use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request-scoped error type for all core operations.
///
/// Every failure is surfaced to the handler and translated into a JSON
/// error body; nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request carried no usable identity.
    #[error("인증 정보가 없습니다")]
    Unauthorized,

    /// Input rejected before any write was attempted.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The underlying store rejected a read or write.
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {:?}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
