//! Application state shared by all subcommands.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use jma_core::{AppError, AreaConfig, AreaSourceKind, Config, ConfigError, DatabaseError};
use jma_forecast::{AreaCatalog, AreaSource, ForecastClient, NormalizedForecastRow};
use jma_store::{AreaRecord, ForecastStore, StoredForecast};
use tokio::runtime::Runtime;

use crate::error_mapping::IntoAppError;
use crate::service::{self, ForecastServiceMessage};

pub struct App {
    config: Config,
    runtime: Runtime,
    client: Arc<ForecastClient>,
    tx: Sender<ForecastServiceMessage>,
    rx: Receiver<ForecastServiceMessage>,
}

impl App {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("jma-tokio")
            .build()?;

        let timeout = match config.forecast.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let client = ForecastClient::with_options(&config.forecast.base_url, timeout)
            .map_err(IntoAppError::into_app_error)?;

        let (tx, rx) = mpsc::channel();

        tracing::info!("Forecast endpoint: {}", client.base_url());
        Ok(Self {
            config,
            runtime,
            client: Arc::new(client),
            tx,
            rx,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the area catalog from the configured source.
    ///
    /// A failure yields an empty catalog together with the error to show.
    pub fn load_catalog(&self) -> (AreaCatalog, Option<AppError>) {
        let source = match area_source(&self.config.areas) {
            Ok(source) => source,
            Err(e) => return (AreaCatalog::default(), Some(e)),
        };

        let (catalog, err) = self
            .runtime
            .block_on(AreaCatalog::load_or_empty(&source, &self.client));
        (catalog, err.map(IntoAppError::into_app_error))
    }

    /// Queue a fetch for `area_code`; the result arrives via [`App::wait_fetch`].
    pub fn request_fetch(&self, area_code: &str) {
        service::request_fetch(
            self.runtime.handle(),
            &self.tx,
            Arc::clone(&self.client),
            area_code.to_string(),
        );
    }

    /// Block until the fetch for `area_code` completes.
    pub fn wait_fetch(&self, area_code: &str) -> Result<Vec<NormalizedForecastRow>, AppError> {
        loop {
            let message = self.rx.recv().map_err(|e| {
                AppError::Other(anyhow::anyhow!("forecast service stopped: {}", e))
            })?;

            match message {
                ForecastServiceMessage::FetchDone { area_code: done, result } if done == area_code => {
                    return result.map_err(IntoAppError::into_app_error);
                }
                ForecastServiceMessage::FetchDone { area_code: stale, .. } => {
                    tracing::debug!("Ignoring stale result for area {}", stale);
                }
            }
        }
    }

    /// Fetch and project one area's forecast off the calling thread.
    pub fn fetch_rows(&self, area_code: &str) -> Result<Vec<NormalizedForecastRow>, AppError> {
        self.request_fetch(area_code);
        self.wait_fetch(area_code)
    }

    /// Open the forecast database. Each operation opens its own handle and
    /// drops it when done.
    pub fn open_store(&self) -> Result<ForecastStore, AppError> {
        let path = self.config.database_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Opening forecast database at {}", path.display());
        ForecastStore::new(&path).map_err(|e| {
            AppError::Database(DatabaseError::ConnectionFailed(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })
    }

    /// Persist rows under `area_code`. Returns the number of rows written;
    /// nothing is written when storage is disabled or `rows` is empty.
    pub fn persist(&self, area_code: &str, rows: &[NormalizedForecastRow]) -> Result<usize, AppError> {
        if !self.config.storage.enabled {
            tracing::debug!("Storage disabled, not saving {} rows", rows.len());
            return Ok(0);
        }
        let Some(first) = rows.first() else {
            return Ok(0);
        };

        let store = self.open_store()?;
        store
            .store_forecast(area_code, &first.area_name, rows)
            .map_err(IntoAppError::into_app_error)
    }

    pub fn history(&self, area_code: &str) -> Result<Vec<StoredForecast>, AppError> {
        let store = self.open_store()?;
        store
            .list_forecasts(area_code)
            .map_err(IntoAppError::into_app_error)
    }

    /// Stored areas and the total number of stored forecast rows.
    pub fn stored_areas(&self) -> Result<(Vec<AreaRecord>, u32), AppError> {
        let store = self.open_store()?;
        let areas = store.list_areas().map_err(IntoAppError::into_app_error)?;
        let count = store.forecast_count().map_err(IntoAppError::into_app_error)?;
        Ok((areas, count))
    }
}

fn area_source(config: &AreaConfig) -> Result<AreaSource, AppError> {
    match config.source {
        AreaSourceKind::Bundled => Ok(AreaSource::Bundled),
        AreaSourceKind::Remote => Ok(AreaSource::Remote(config.remote_url.clone())),
        AreaSourceKind::File => config
            .file_path
            .as_ref()
            .map(|p| AreaSource::File(PathBuf::from(p)))
            .ok_or_else(|| {
                AppError::Config(ConfigError::Invalid(
                    "areas.file_path is required when areas.source = \"file\"".to_string(),
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use jma_core::NetworkError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAYLOAD: &str = r#"[{"publishingOffice":"気象庁","reportDatetime":"2024-06-01T17:00:00+09:00",
        "timeSeries":[{"timeDefines":["2024-06-01T17:00:00+09:00"],
        "areas":[{"area":{"name":"東京地方","code":"130010"},"weathers":["晴れ"],"pops":["30"]}]}]}]"#;

    fn test_config(dir: &std::path::Path, base_url: &str) -> Config {
        let mut config = Config::default();
        config.config_dir = dir.to_path_buf();
        config.forecast.base_url = base_url.to_string();
        config
    }

    fn mock_server(rt: &Runtime) -> MockServer {
        rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/130000.json"))
                .respond_with(ResponseTemplate::new(200).set_body_string(PAYLOAD))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/999999.json"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;
            server
        })
    }

    #[test]
    fn fetch_persist_and_read_history() {
        let server_rt = Runtime::new().unwrap();
        let server = mock_server(&server_rt);
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(test_config(dir.path(), &server.uri())).unwrap();

        let rows = app.fetch_rows("130000").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(app.persist("130000", &rows).unwrap(), 1);

        let history = app.history("130000").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].area_name, "東京地方");
        assert_eq!(history[0].record.precipitation_probability, Some(30));

        let (areas, count) = app.stored_areas().unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].code, "130000");
        assert_eq!(count, 1);
    }

    #[test]
    fn history_of_unknown_area_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(test_config(dir.path(), "http://127.0.0.1:9")).unwrap();

        let err = app.history("999999").unwrap_err();
        assert!(matches!(err, AppError::Database(DatabaseError::NotFound(_))));
        assert_eq!(err.user_message(), "No stored forecasts for this area.");
    }

    #[test]
    fn unopenable_database_is_connection_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path(), "http://127.0.0.1:9");
        // A directory cannot be opened as a database file.
        std::fs::create_dir(dir.path().join("db")).unwrap();
        config.storage.database_file = "db".to_string();
        let app = App::new(config).unwrap();

        let err = app.history("130000").unwrap_err();
        assert!(matches!(
            err,
            AppError::Database(DatabaseError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn empty_database_has_no_stored_areas() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(test_config(dir.path(), "http://127.0.0.1:9")).unwrap();

        let (areas, count) = app.stored_areas().unwrap();
        assert!(areas.is_empty());
        assert_eq!(count, 0);
    }

    #[test]
    fn http_error_is_mapped() {
        let server_rt = Runtime::new().unwrap();
        let server = mock_server(&server_rt);
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(test_config(dir.path(), &server.uri())).unwrap();

        let err = app.fetch_rows("999999").unwrap_err();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::HttpStatus { status: 404 })
        ));
    }

    #[test]
    fn disabled_storage_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path(), "http://127.0.0.1:9");
        config.storage.enabled = false;
        let app = App::new(config).unwrap();

        let rows = vec![NormalizedForecastRow {
            area_name: "東京地方".into(),
            area_code: "130010".into(),
            publishing_office: "気象庁".into(),
            report_time: "2024-06-01T17:00:00+09:00".into(),
            time_defines: vec![],
            weather_text: vec!["晴れ".into()],
            wind_text: vec![jma_forecast::NO_INFO.into()],
            precipitation_probability: vec![jma_forecast::NO_INFO.into()],
            temperatures: vec![jma_forecast::NO_INFO.into()],
            temperature_min: jma_forecast::UNKNOWN.into(),
            temperature_max: jma_forecast::UNKNOWN.into(),
        }];
        assert_eq!(app.persist("130000", &rows).unwrap(), 0);
        assert!(!app.config().database_path().exists());
    }

    #[test]
    fn file_source_without_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path(), "http://127.0.0.1:9");
        config.areas.source = AreaSourceKind::File;
        let app = App::new(config).unwrap();

        let (catalog, err) = app.load_catalog();
        assert!(catalog.is_empty());
        assert!(matches!(err, Some(AppError::Config(_))));
    }

    #[test]
    fn bundled_catalog_loads() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(test_config(dir.path(), "http://127.0.0.1:9")).unwrap();

        let (catalog, err) = app.load_catalog();
        assert!(err.is_none());
        assert!(catalog.choices().iter().any(|c| c.child_code == "130000"));
    }
}
