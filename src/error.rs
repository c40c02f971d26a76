use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::SqlErr;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("Database error")]
    Db(#[from] sqlx::Error),

    #[error("Database error")]
    Orm(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(move |err| {
                        let text = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string());
                        format!("{field}: {text}")
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        // Field order from the validator is a hash map order; keep output stable.
        details.sort();
        Self::Validation(details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                details,
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized".to_string(),
                Vec::new(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            AppError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg, Vec::new())
            }
            AppError::Db(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Vec::new(),
                )
            }
            AppError::Orm(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => (
                    StatusCode::CONFLICT,
                    "Record already exists".to_string(),
                    Vec::new(),
                ),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => (
                    StatusCode::CONFLICT,
                    "Record is still referenced by other data".to_string(),
                    Vec::new(),
                ),
                _ => {
                    tracing::error!(error = %err, "orm error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                        Vec::new(),
                    )
                }
            },
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = ApiResponse::failure(status, message, details);
        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1, message = "qty must be positive"))]
        qty: i32,
    }

    #[test]
    fn validation_errors_become_sorted_field_details() {
        let err = Probe {
            name: String::new(),
            qty: 0,
        }
        .validate()
        .unwrap_err();

        match AppError::from(err) {
            AppError::Validation(details) => {
                assert_eq!(
                    details,
                    vec![
                        "name: name is required".to_string(),
                        "qty: qty must be positive".to_string(),
                    ]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn display_uses_carried_message() {
        assert_eq!(
            AppError::NotFound("order not found".into()).to_string(),
            "order not found"
        );
        assert_eq!(AppError::Unauthorized.to_string(), "Unauthorized");
    }
}
