use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use users_shared::api::ApiResponse;
use uuid::Uuid;

use crate::repository::RepositoryError;

/// Field name (as it appears on the wire) to human readable message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Provided entity is null")]
    NullInput,

    #[error("Mapper was given a null request or user")]
    NullArgument,

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Unique constraint violations: {}", describe(.0))]
    UniqueConstraintViolation(FieldErrors),

    #[error("User with id {0} not found")]
    NotFound(Uuid),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Repository error: {0}")]
    Database(RepositoryError),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(field) => {
                let mut fields = FieldErrors::new();
                fields.insert(field.key().to_string(), field.conflict_message().to_string());
                AppError::UniqueConstraintViolation(fields)
            }
            RepositoryError::Missing(id) => AppError::NotFound(id),
            other => AppError::Database(other),
        }
    }
}

fn describe(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("[{field}: {message}]"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, data) = match &self {
            AppError::NullInput | AppError::NullArgument => (
                StatusCode::BAD_REQUEST,
                format!("Entity is null: {self}"),
                None,
            ),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                self.to_string(),
                Some(fields.clone()),
            ),
            AppError::UniqueConstraintViolation(fields) => (
                StatusCode::CONFLICT,
                format!("Conflict: {self}"),
                Some(fields.clone()),
            ),
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                format!("Entity not found: {self}"),
                None,
            ),
            AppError::MalformedRequest(detail) => {
                tracing::debug!("Rejected request body: {}", detail);
                (
                    StatusCode::BAD_REQUEST,
                    "Malformed JSON request".to_string(),
                    None,
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::new(status.as_u16(), message, data));

        (status, body).into_response()
    }
}
