//! Persists the Tokyo fixture to an on-disk database and reads it back.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use jma_forecast::{project, RawForecastPayload, NO_INFO};
use jma_store::ForecastStore;

const FIXTURE: &str = include_str!("../../jma-forecast/tests/fixtures/130000.json");

#[test]
fn test_persist_tokyo_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("weather_forecast.db");

    let rows = project(&RawForecastPayload::from_json_str(FIXTURE).unwrap()).unwrap();

    {
        let store = ForecastStore::new(&db_path).unwrap();
        let written = store.store_forecast("130000", &rows[0].area_name, &rows).unwrap();
        assert_eq!(written, rows.len());
    }

    // Reopen to make sure everything was committed to disk.
    let store = ForecastStore::new(&db_path).unwrap();

    let area = store.get_area("130000").unwrap().unwrap();
    assert_eq!(area.name, "東京地方");

    let stored = store.list_forecasts("130000").unwrap();
    assert_eq!(stored.len(), 8);

    // Row order follows projection order.
    let weathers: Vec<&str> = stored.iter().map(|s| s.record.weather.as_str()).collect();
    assert_eq!(weathers[0], "くもり　夜遅く　雨");
    assert_eq!(weathers[1], "雨");
    assert!(weathers[2..].iter().all(|w| *w == NO_INFO));

    // Temperature reduction: point temps first, then nested extremes.
    assert_eq!(stored[4].record.temperature, Some(17.0));
    assert_eq!(stored[5].record.temperature, Some(18.0));
    assert_eq!(stored[7].record.temperature, Some(26.0));
    assert_eq!(stored[0].record.temperature, None);

    // Precipitation: first pop, blank week-range pop stays NULL.
    assert_eq!(stored[2].record.precipitation_probability, Some(10));
    assert_eq!(stored[3].record.precipitation_probability, Some(60));
    assert_eq!(stored[6].record.precipitation_probability, None);

    assert!(stored
        .iter()
        .all(|s| s.record.forecast_date == "2024-06-01T17:00:00+09:00"));
}
