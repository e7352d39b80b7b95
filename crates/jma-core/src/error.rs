//! Application error hierarchy.
//!
//! Library crates keep their own error enums; the front end maps them into
//! [`AppError`] and shows `user_message()` instead of a blank result.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Area catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Database(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Catalog(_) => "No regions available. The area list could not be loaded.",
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::HttpStatus { status: 404 } => {
                "No forecast is published for this area code."
            }
            NetworkError::HttpStatus { status } if *status >= 500 => {
                "The forecast service is experiencing issues. Please try again later."
            }
            NetworkError::HttpStatus { .. } => "The forecast request failed. Please try again.",
            NetworkError::InvalidRequest(_) => "That area code is not valid. Pick one from the area list.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Database/storage errors (SQLite).
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => {
                "Unable to open the forecast database. Check the storage settings."
            }
            DatabaseError::QueryFailed(_) => {
                "A forecast database operation failed. Please try again."
            }
            DatabaseError::ConstraintViolation(_) => {
                "The forecast could not be saved because it conflicts with stored data."
            }
            DatabaseError::NotFound(_) => "No stored forecasts for this area.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Network(NetworkError::HttpStatus { status: 404 }),
            AppError::Database(DatabaseError::QueryFailed("test".into())),
            AppError::Database(DatabaseError::NotFound("130000".into())),
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::Catalog("missing".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let net_err = NetworkError::Timeout;
        let app_err: AppError = net_err.into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_status_specific_messages() {
        let not_found = AppError::Network(NetworkError::HttpStatus { status: 404 });
        assert!(not_found.user_message().contains("No forecast"));

        let server = AppError::Network(NetworkError::HttpStatus { status: 503 });
        assert!(server.user_message().contains("later"));
    }
}
