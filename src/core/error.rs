//! 核心错误处理模块

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use super::validation::FieldError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),

    #[error(transparent)]
    Body(#[from] BytesRejection),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// 错误响应结构
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// 校验失败响应结构
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse { errors }),
            )
                .into_response(),
            ApiError::NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
            ApiError::OriginNotAllowed(origin) => {
                warn!(%origin, "Rejected cross-origin request");
                error_response(StatusCode::FORBIDDEN, "Origin not allowed")
            }
            ApiError::Body(rejection) => error_response(rejection.status(), rejection.body_text()),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: message.into(),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::Location;

    #[test]
    fn test_status_codes() {
        let validation = ApiError::Validation(vec![FieldError::new(
            Location::Params,
            "id",
            None,
            "Invalid ID",
        )]);
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let not_found = ApiError::NotFound("Product not found".to_string());
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let origin = ApiError::OriginNotAllowed("http://evil.test".to_string());
        assert_eq!(origin.into_response().status(), StatusCode::FORBIDDEN);

        let database = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(
            database.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display() {
        let error = ApiError::Validation(vec![
            FieldError::new(Location::Body, "name", None, "a"),
            FieldError::new(Location::Body, "price", None, "b"),
        ]);
        assert_eq!(error.to_string(), "request validation failed with 2 error(s)");
    }
}
