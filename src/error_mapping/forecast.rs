use jma_core::{AppError, NetworkError};
use jma_forecast::ForecastError;

use super::IntoAppError;

impl IntoAppError for ForecastError {
    fn into_app_error(self) -> AppError {
        match self {
            ForecastError::SourceUnavailable(s) => AppError::Catalog(s),
            ForecastError::InvalidAreaCode(code) => {
                AppError::Network(NetworkError::InvalidRequest(code))
            }
            ForecastError::HttpStatus { code } => {
                AppError::Network(NetworkError::HttpStatus { status: code })
            }
            ForecastError::Transport(e) if e.is_timeout() => AppError::Network(NetworkError::Timeout),
            ForecastError::Transport(e) => {
                AppError::Network(NetworkError::ConnectionFailed(e.to_string()))
            }
            ForecastError::MalformedPayload(s) => {
                AppError::Network(NetworkError::InvalidResponse(s))
            }
        }
    }
}
