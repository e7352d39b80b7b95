//! Forecast-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Area catalog unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid area code: {0:?}")]
    InvalidAreaCode(String),

    #[error("Forecast request failed with HTTP status {code}")]
    HttpStatus { code: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed forecast payload: {0}")]
    MalformedPayload(String),
}
