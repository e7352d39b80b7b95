//! Flattens the nested forecast payload into display/storage rows.
//!
//! Rows come out in encounter order: document, then series, then area.
//! Absent fields are replaced with visible placeholders instead of being
//! dropped, so a sparse payload still yields one row per area entry.

use serde::Deserialize;

use crate::error::ForecastError;
use crate::types::{
    AreaEntry, Celsius, ForecastDocument, NormalizedForecastRow, RawForecastPayload, TimeSeries,
    NO_INFO, UNKNOWN,
};

/// Project a raw payload into normalized rows.
///
/// Fails only when the payload is not a list of objects. Fields of an
/// unexpected type are treated as absent and get placeholders.
pub fn project(payload: &RawForecastPayload) -> Result<Vec<NormalizedForecastRow>, ForecastError> {
    let documents = parse_documents(payload)?;
    let rows = project_documents(&documents);
    tracing::debug!(
        "Projected {} rows from {} forecast documents",
        rows.len(),
        documents.len()
    );
    Ok(rows)
}

/// Read the top-level array into typed documents.
pub fn parse_documents(payload: &RawForecastPayload) -> Result<Vec<ForecastDocument>, ForecastError> {
    let value = payload.as_value();
    let items = value.as_array().ok_or_else(|| {
        ForecastError::MalformedPayload(format!(
            "expected a list of forecast documents, got {}",
            json_kind(value)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(ForecastError::MalformedPayload(format!(
                    "document {} is {}, expected an object",
                    i,
                    json_kind(item)
                )));
            }
            ForecastDocument::deserialize(item)
                .map_err(|e| ForecastError::MalformedPayload(format!("document {}: {}", i, e)))
        })
        .collect()
}

/// Walk every series of every document and emit one row per area entry.
pub fn project_documents(documents: &[ForecastDocument]) -> Vec<NormalizedForecastRow> {
    let mut rows = Vec::new();

    for (doc_index, document) in documents.iter().enumerate() {
        let Some(series_list) = document.time_series.as_deref() else {
            tracing::debug!("Document {} has no timeSeries, skipping", doc_index);
            continue;
        };

        for series in series_list {
            for entry in series.areas.iter().flatten() {
                rows.push(normalize_entry(document, series, entry));
            }
        }
    }

    rows
}

fn normalize_entry(
    document: &ForecastDocument,
    series: &TimeSeries,
    entry: &AreaEntry,
) -> NormalizedForecastRow {
    let area = entry.area.as_ref();

    let weather_text = match (&entry.weathers, &entry.weather) {
        (Some(weathers), _) => or_placeholder(weathers),
        (None, Some(weather)) => vec![weather.clone()],
        (None, None) => vec![NO_INFO.to_string()],
    };

    let range = entry.temperature.as_ref();

    NormalizedForecastRow {
        area_name: text_or(area.and_then(|a| a.name.as_ref()), NO_INFO),
        area_code: text_or(area.and_then(|a| a.code.as_ref()), NO_INFO),
        publishing_office: text_or(document.publishing_office.as_ref(), NO_INFO),
        report_time: text_or(document.report_datetime.as_ref(), NO_INFO),
        time_defines: series.time_defines.clone().unwrap_or_default(),
        weather_text,
        wind_text: list_or_placeholder(entry.winds.as_ref()),
        precipitation_probability: list_or_placeholder(entry.pops.as_ref()),
        temperatures: list_or_placeholder(entry.temps.as_ref()),
        temperature_min: celsius_or_unknown(range.and_then(|r| r.min.as_ref())),
        temperature_max: celsius_or_unknown(range.and_then(|r| r.max.as_ref())),
    }
}

fn text_or(value: Option<&String>, placeholder: &str) -> String {
    value.cloned().unwrap_or_else(|| placeholder.to_string())
}

fn list_or_placeholder(values: Option<&Vec<String>>) -> Vec<String> {
    values.map_or_else(|| vec![NO_INFO.to_string()], |v| or_placeholder(v))
}

// An empty upstream list would join to "", which reads as a rendering bug.
fn or_placeholder(values: &[String]) -> Vec<String> {
    if values.is_empty() {
        vec![NO_INFO.to_string()]
    } else {
        values.to_vec()
    }
}

fn celsius_or_unknown(value: Option<&Celsius>) -> String {
    value
        .and_then(|c| c.celsius.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
