use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ForecastError;

/// Placeholder for absent text fields (weather, wind, precipitation, names).
pub const NO_INFO: &str = "情報なし";

/// Placeholder for absent temperature extremes.
pub const UNKNOWN: &str = "不明";

/// A forecast region from the area catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub code: String,
    pub name: String,
    pub en_name: Option<String>,
    pub office_name: Option<String>,
    /// Child area codes, in catalog order.
    pub children: Vec<String>,
}

/// Forecast JSON exactly as the endpoint returned it.
///
/// Nothing is validated here; the projector navigates it defensively.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastPayload(serde_json::Value);

impl RawForecastPayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Parse a response body. Only invalid JSON is rejected.
    pub fn from_json_str(body: &str) -> Result<Self, ForecastError> {
        serde_json::from_str(body)
            .map(Self)
            .map_err(|e| ForecastError::MalformedPayload(format!("invalid JSON: {}", e)))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// One element of the top-level payload array (short-range or week-range bulletin).
///
/// Every field of the payload structs is read leniently: a value of the
/// wrong type counts as absent, so one odd field never costs the document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDocument {
    #[serde(default, deserialize_with = "lenient_text")]
    pub publishing_office: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub report_datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub time_series: Option<Vec<TimeSeries>>,
}

/// A `timeSeries` entry: one category of data across one or more areas.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub time_defines: Option<Vec<String>>,
    /// Entries that are not objects are dropped.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub areas: Option<Vec<AreaEntry>>,
}

/// Per-area values inside a series. Every field is independently optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub area: Option<AreaRef>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weather: Option<String>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub weathers: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub winds: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub pops: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub temps: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<TemperatureRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AreaRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemperatureRange {
    #[serde(default, deserialize_with = "lenient")]
    pub min: Option<Celsius>,
    #[serde(default, deserialize_with = "lenient")]
    pub max: Option<Celsius>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Celsius {
    #[serde(default, deserialize_with = "lenient_text")]
    pub celsius: Option<String>,
}

/// Strings pass through and numbers are shown as written; anything else
/// has no text form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

/// A list of scalars. Elements without a text form become [`NO_INFO`] so
/// positions line up with `timeDefines`.
fn lenient_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_array().map(|items| {
        items
            .iter()
            .map(|item| scalar_text(item).unwrap_or_else(|| NO_INFO.to_string()))
            .collect()
    }))
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// A flattened forecast row, one per per-area entry in the payload.
///
/// Text fields that were absent upstream hold [`NO_INFO`]; absent
/// temperature extremes hold [`UNKNOWN`]. List fields are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedForecastRow {
    pub area_name: String,
    pub area_code: String,
    pub publishing_office: String,
    /// `reportDatetime` of the document, kept verbatim.
    pub report_time: String,
    /// `timeDefines` of the series; may be empty.
    pub time_defines: Vec<String>,
    pub weather_text: Vec<String>,
    pub wind_text: Vec<String>,
    pub precipitation_probability: Vec<String>,
    pub temperatures: Vec<String>,
    pub temperature_min: String,
    pub temperature_max: String,
}

impl NormalizedForecastRow {
    /// True when either extreme came from the payload rather than the placeholder.
    pub fn has_temperature_range(&self) -> bool {
        self.temperature_min != UNKNOWN || self.temperature_max != UNKNOWN
    }
}
