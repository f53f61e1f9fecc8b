use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tabula_core::AppError;
use ts_rs::TS;

/// Message shown for storage and other unexpected failures.
const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = match self.0 {
            AppError::InvalidFields(errors) => ErrorResponse {
                success: false,
                message: "Please correct the highlighted fields.".to_owned(),
                errors: Some(errors.as_map().clone()),
            },
            AppError::Internal(detail) => {
                tracing::error!(%detail, "request failed with internal error");
                ErrorResponse {
                    success: false,
                    message: INTERNAL_ERROR_MESSAGE.to_owned(),
                    errors: None,
                }
            }
            other => ErrorResponse {
                success: false,
                message: other.to_string(),
                errors: None,
            },
        };

        (status, Json(payload)).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
