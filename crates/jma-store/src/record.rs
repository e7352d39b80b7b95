//! Database record shapes and the reduction from normalized rows.

use jma_forecast::NormalizedForecastRow;

/// A row of the `areas` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRecord {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// The stored projection of one [`NormalizedForecastRow`].
///
/// Lossy: list fields keep only their first element and the temperature is
/// reduced to a single number.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    pub forecast_date: String,
    pub weather: String,
    pub temperature: Option<f64>,
    pub wind: String,
    pub precipitation_probability: Option<i64>,
}

impl ForecastRecord {
    /// Reduce a row to its stored form.
    ///
    /// `temperature` is the first `temps` value if it parses as a number,
    /// otherwise the max extreme, otherwise the min extreme; placeholders
    /// and blanks become NULL. `precipitation_probability` is the first
    /// `pops` value parsed as an integer, or NULL.
    pub fn from_row(row: &NormalizedForecastRow) -> Self {
        let temperature = first(&row.temperatures)
            .and_then(parse_f64)
            .or_else(|| parse_f64(&row.temperature_max))
            .or_else(|| parse_f64(&row.temperature_min));

        Self {
            forecast_date: row.report_time.clone(),
            weather: first(&row.weather_text).unwrap_or_default().to_string(),
            temperature,
            wind: first(&row.wind_text).unwrap_or_default().to_string(),
            precipitation_probability: first(&row.precipitation_probability)
                .and_then(|s| s.trim().parse::<i64>().ok()),
        }
    }
}

/// A forecast read back from the database, joined with its area.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredForecast {
    pub id: i64,
    pub area_code: String,
    pub area_name: String,
    pub record: ForecastRecord,
}

fn first(values: &[String]) -> Option<&str> {
    values.first().map(String::as_str)
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
