//! Japan Meteorological Agency forecasts for jma-weather
//!
//! Loads the area catalog, fetches forecast JSON per area code and
//! projects it into flat rows for display and storage.

pub mod area;
pub mod client;
pub mod error;
pub mod projector;
pub mod types;

pub use area::{AreaCatalog, AreaChoice, AreaSource};
pub use client::ForecastClient;
pub use error::ForecastError;
pub use projector::project;
pub use types::*;
