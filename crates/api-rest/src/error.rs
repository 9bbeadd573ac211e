//! Conversion of failures into HTTP responses.
//!
//! Every failure leaves the service as an [`ErrorRes`] body. Storage failures are logged with
//! their full detail but answered with a generic message.

use api_shared::{ErrorRes, FieldErrorRes};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use records_core::RecordError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Record(RecordError),
    Json(JsonRejection),
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        ApiError::Record(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Json(rejection)
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorRes) {
        match self {
            ApiError::Json(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (rejection.status(), ErrorRes::new(rejection.body_text()))
            }
            ApiError::Record(err) if err.is_storage() => {
                tracing::error!("Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes::new("Internal error"),
                )
            }
            ApiError::Record(RecordError::Validation(errors)) => {
                tracing::warn!("Validation failed: {}", errors);
                let body = ErrorRes {
                    detail: errors.to_string(),
                    errors: errors
                        .violations()
                        .iter()
                        .map(|v| FieldErrorRes {
                            field: v.field.to_string(),
                            message: v.message.clone(),
                        })
                        .collect(),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }
            ApiError::Record(RecordError::NotFound(id)) => {
                tracing::warn!("Patient {} not found", id);
                (StatusCode::NOT_FOUND, ErrorRes::new("Patient not found"))
            }
            ApiError::Record(RecordError::Duplicate(id)) => {
                tracing::warn!("Patient {} already exists", id);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorRes::new("Patient with this ID already exists"),
                )
            }
            ApiError::Record(RecordError::InvalidArgument(message)) => {
                tracing::warn!("Invalid argument: {}", message);
                (StatusCode::BAD_REQUEST, ErrorRes::new(message))
            }
            // Remaining variants are storage failures, handled above.
            ApiError::Record(err) => {
                tracing::error!("Unexpected error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes::new("Internal error"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
