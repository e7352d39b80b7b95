//! HTTP client for the JMA forecast endpoint.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::instrument;

use crate::error::ForecastError;
use crate::types::RawForecastPayload;

const USER_AGENT: &str = concat!("jma-weather/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Arc<Client>,
    base_url: String,
}

impl ForecastClient {
    /// Client for an arbitrary base URL. `None` disables the request timeout.
    pub fn with_options(base_url: &str, timeout: Option<Duration>) -> Result<Self, ForecastError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the forecast document for an area code.
    pub fn endpoint(&self, area_code: &str) -> String {
        format!("{}/{}.json", self.base_url, area_code)
    }

    /// Fetch the forecast for one area code.
    ///
    /// Only status 200 counts as success; any other status is reported as
    /// [`ForecastError::HttpStatus`] and no payload is returned.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, area_code: &str) -> Result<RawForecastPayload, ForecastError> {
        validate_area_code(area_code)?;
        let url = self.endpoint(area_code);
        let body = self.get_text(&url).await?;
        RawForecastPayload::from_json_str(&body)
    }

    /// GET a URL and return the body of a 200 response.
    pub(crate) async fn get_text(&self, url: &str) -> Result<String, ForecastError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("GET {} returned status {}", url, status);
            return Err(ForecastError::HttpStatus {
                code: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Area codes are interpolated into the URL path, so only ASCII
/// alphanumerics are accepted.
pub fn validate_area_code(area_code: &str) -> Result<(), ForecastError> {
    if area_code.is_empty() || !area_code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ForecastError::InvalidAreaCode(area_code.to_string()));
    }
    Ok(())
}
