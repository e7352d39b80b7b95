//! End-to-end check for Tokyo (130000) against a mock JMA server.
//!
//! The fixture holds a short-range and a week-range document; the expected
//! rows below are worked out by hand from it.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use jma_forecast::{
    project, AreaCatalog, ForecastClient, ForecastError, NormalizedForecastRow, RawForecastPayload,
    NO_INFO, UNKNOWN,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("fixtures/130000.json");
const REPORT: &str = "2024-06-01T17:00:00+09:00";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Builder for expected rows; starts from an all-placeholder row.
fn row(name: &str, code: &str, time_defines: &[&str]) -> NormalizedForecastRow {
    NormalizedForecastRow {
        area_name: name.to_string(),
        area_code: code.to_string(),
        publishing_office: "気象庁".to_string(),
        report_time: REPORT.to_string(),
        time_defines: strings(time_defines),
        weather_text: strings(&[NO_INFO]),
        wind_text: strings(&[NO_INFO]),
        precipitation_probability: strings(&[NO_INFO]),
        temperatures: strings(&[NO_INFO]),
        temperature_min: UNKNOWN.to_string(),
        temperature_max: UNKNOWN.to_string(),
    }
}

fn expected_rows() -> Vec<NormalizedForecastRow> {
    let short_days = [
        "2024-06-01T17:00:00+09:00",
        "2024-06-02T00:00:00+09:00",
        "2024-06-03T00:00:00+09:00",
    ];
    let pop_slots = [
        "2024-06-01T18:00:00+09:00",
        "2024-06-02T00:00:00+09:00",
        "2024-06-02T06:00:00+09:00",
        "2024-06-02T12:00:00+09:00",
    ];
    let temp_slots = ["2024-06-02T00:00:00+09:00", "2024-06-02T09:00:00+09:00"];
    let week_days = [
        "2024-06-02T00:00:00+09:00",
        "2024-06-03T00:00:00+09:00",
        "2024-06-04T00:00:00+09:00",
    ];

    // Short-range document, series 0: weather and wind text.
    let mut tokyo_weather = row("東京地方", "130010", &short_days);
    tokyo_weather.weather_text =
        strings(&["くもり　夜遅く　雨", "晴れ　時々　くもり", "くもり　時々　晴れ"]);
    tokyo_weather.wind_text = strings(&["南の風　やや強く", "北の風　後　南の風", "南の風"]);

    let mut izu_weather = row("伊豆諸島北部", "130020", &short_days);
    izu_weather.weather_text = strings(&["雨", "くもり", "くもり　時々　晴れ"]);
    izu_weather.wind_text = strings(&["南西の風　強く", "南西の風", "南の風"]);

    // Series 1: precipitation probability.
    let mut tokyo_pops = row("東京地方", "130010", &pop_slots);
    tokyo_pops.precipitation_probability = strings(&["10", "40", "30", "20"]);

    let mut izu_pops = row("伊豆諸島北部", "130020", &pop_slots);
    izu_pops.precipitation_probability = strings(&["60", "50", "30", "20"]);

    // Series 2: point temperatures.
    let mut tokyo_temps = row("東京", "44132", &temp_slots);
    tokyo_temps.temperatures = strings(&["17", "27"]);

    let mut oshima_temps = row("大島", "44172", &temp_slots);
    oshima_temps.temperatures = strings(&["18", "24"]);

    // Week-range document: pops only, then nested temperature extremes.
    let mut week_pops = row("東京地方", "130010", &week_days);
    week_pops.precipitation_probability = strings(&["", "20", "50"]);

    let mut week_temps = row("東京", "44132", &week_days);
    week_temps.temperature_min = "18".to_string();
    week_temps.temperature_max = "26".to_string();

    vec![
        tokyo_weather,
        izu_weather,
        tokyo_pops,
        izu_pops,
        tokyo_temps,
        oshima_temps,
        week_pops,
        week_temps,
    ]
}

async fn mock_jma() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bosai/forecast/data/forecast/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "application/json"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bosai/forecast/data/forecast/000000.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    mock_server
}

fn client_for(server: &MockServer) -> ForecastClient {
    let base = format!("{}/bosai/forecast/data/forecast/", server.uri());
    ForecastClient::with_options(&base, Some(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn test_tokyo_end_to_end() {
    let mock_server = mock_jma().await;
    let client = client_for(&mock_server);

    // Tokyo is selectable from the bundled catalog.
    let catalog = AreaCatalog::bundled().unwrap();
    assert!(catalog
        .choices()
        .iter()
        .any(|c| c.child_code == "130000" && c.center_code == "010300"));

    let payload = client.fetch("130000").await.unwrap();
    let rows = project(&payload).unwrap();

    assert_eq!(rows.len(), 8);
    assert_eq!(rows, expected_rows());

    // At least one field came from a placeholder.
    assert!(rows.iter().any(|r| r.temperature_min == UNKNOWN));
    assert!(rows.iter().any(|r| r.weather_text == vec![NO_INFO.to_string()]));
}

#[tokio::test]
async fn test_not_found_yields_no_rows() {
    let mock_server = mock_jma().await;
    let client = client_for(&mock_server);

    let result = client.fetch("000000").await;
    assert!(matches!(result, Err(ForecastError::HttpStatus { code: 404 })));
}

#[test]
fn test_fixture_projection_is_stable() {
    let payload = RawForecastPayload::from_json_str(FIXTURE).unwrap();
    let first = project(&payload).unwrap();
    let second = project(&payload).unwrap();
    assert_eq!(first, second);
}
