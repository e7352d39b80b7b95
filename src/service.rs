//! Forecast backend: async fetch + projection.
//! Network work runs on the runtime; results are sent back via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use jma_forecast::{project, ForecastClient, ForecastError, NormalizedForecastRow};
use tokio::runtime::Handle;

/// Messages sent from async operations back to the caller's thread
#[derive(Debug)]
pub enum ForecastServiceMessage {
    /// Result of fetching and projecting one area's forecast
    FetchDone {
        area_code: String,
        result: Result<Vec<NormalizedForecastRow>, ForecastError>,
    },
}

/// Request a forecast for `area_code` asynchronously.
/// Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    runtime: &Handle,
    tx: &Sender<ForecastServiceMessage>,
    client: Arc<ForecastClient>,
    area_code: String,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = match client.fetch(&area_code).await {
            Ok(payload) => project(&payload),
            Err(e) => Err(e),
        };

        match &result {
            Ok(rows) => tracing::info!("Projected {} rows for area {}", rows.len(), area_code),
            Err(e) => tracing::warn!("Forecast for area {} failed: {}", area_code, e),
        }

        let _ = tx.send(ForecastServiceMessage::FetchDone { area_code, result });
    });
}
