//! Maps library errors to jma_core::AppError for consistent user-facing messages.
//! Each library has its own module to keep mappings small and readable.

mod forecast;
mod store;

use jma_core::AppError;

/// Conversion into the application error hierarchy.
///
/// A trait rather than `From` because both sides live in other crates.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}
