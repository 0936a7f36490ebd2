use common_errors::AppError;
use sql_connection::{PgError, PoolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OwnerError {
    #[error("Owner not found: {owner_id}")]
    NotFound { owner_id: i32 },
    #[error("Database error: {0}")]
    Database(#[from] PgError),
    #[error("Database Pool error: {0}")]
    DatabasePool(#[from] PoolError),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<OwnerError> for AppError {
    fn from(err: OwnerError) -> Self {
        match err {
            OwnerError::NotFound { owner_id } => {
                AppError::not_found(
                    "OWNER_NOT_FOUND",
                    &format!("Owner with ID {owner_id} not found"),
                )
            }
            OwnerError::Database(db_err) => {
                AppError::internal_server_error(&format!(
                    "Database error: {db_err}"
                ))
            }
            OwnerError::DatabasePool(pool_err) => {
                AppError::internal_server_error(&format!(
                    "Database connection error: {pool_err}"
                ))
            }
            OwnerError::InternalError(msg) => {
                AppError::internal_server_error(&format!(
                    "Internal error: {msg}"
                ))
            }
        }
    }
}
