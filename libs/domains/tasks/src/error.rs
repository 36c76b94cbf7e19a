use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("no fields provided to update")]
    NoFieldsToUpdate,

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

/// True for storage errors caused by the backing table not existing yet.
///
/// List operations treat this condition as an empty result so a fresh
/// deployment answers reads before migrations have run.
pub fn is_missing_relation(message: &str) -> bool {
    message.contains("42P01")
        || message.contains("does not exist")
        || message.contains("no such table")
}

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => AppError::NotFound(format!("Task {} not found", id)),
            TaskError::Validation(msg) => AppError::BadRequest(msg),
            TaskError::NoFieldsToUpdate => {
                AppError::EmptyUpdate("no fields provided to update".to_string())
            }
            TaskError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaskError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_relation_detection() {
        assert!(is_missing_relation(
            "error returned from database: relation \"tasks\" does not exist"
        ));
        assert!(is_missing_relation("SQLSTATE 42P01"));
        assert!(is_missing_relation("no such table: tasks"));
        assert!(!is_missing_relation("connection refused"));
    }
}
