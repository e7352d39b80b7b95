use jma_core::{AppError, DatabaseError};
use jma_store::StoreError;

use super::IntoAppError;

impl IntoAppError for StoreError {
    fn into_app_error(self) -> AppError {
        let message = self.to_string();
        match self {
            e if e.is_constraint_violation() => {
                AppError::Database(DatabaseError::ConstraintViolation(message))
            }
            StoreError::AreaNotFound(_) => AppError::Database(DatabaseError::NotFound(message)),
            StoreError::Database(_) => AppError::Database(DatabaseError::QueryFailed(message)),
        }
    }
}
