pub mod config;
pub mod error;

pub use config::{
    AreaConfig, AreaSourceKind, Config, ForecastConfig, StorageConfig, ValidationResult,
};
pub use error::{AppError, ConfigError, DatabaseError, NetworkError};

use anyhow::Result;

/// Initialize logging. Output goes to stderr so stdout carries only forecasts.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("jma-weather core initialized");
    Ok(())
}
