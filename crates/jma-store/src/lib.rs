//! Local SQLite store for jma-weather.
//!
//! Keeps the areas that were looked up and every forecast row fetched for them.

pub mod error;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use record::{AreaRecord, ForecastRecord, StoredForecast};
pub use store::ForecastStore;
