//! Text rendering of projected rows, the area catalog and stored history.

use chrono::DateTime;
use jma_forecast::{AreaCatalog, NormalizedForecastRow};
use jma_store::{AreaRecord, StoredForecast};

/// Shown instead of a blank screen when a fetch yields no rows.
pub const NO_DATA_MESSAGE: &str = "この地域の予報データはありません";

const LIST_SEPARATOR: &str = " / ";

/// Render the report timestamp as `YYYY-MM-DD HH:MM`, or verbatim if it
/// is not RFC 3339.
pub fn format_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn first(values: &[String]) -> &str {
    values.first().map(String::as_str).unwrap_or_default()
}

fn percent(value: &str) -> String {
    if value.trim().parse::<u32>().is_ok() {
        format!("{}%", value)
    } else {
        value.to_string()
    }
}

/// Card view: one block per row, in projection order.
pub fn render_cards(rows: &[NormalizedForecastRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }

    rows.iter().map(card).collect()
}

fn card(row: &NormalizedForecastRow) -> String {
    let mut out = format!(
        "■ {} ({})  {} 発表 {}\n",
        row.area_name,
        row.area_code,
        format_time(&row.report_time),
        row.publishing_office
    );
    if !row.time_defines.is_empty() {
        let times: Vec<String> = row.time_defines.iter().map(|t| format_time(t)).collect();
        out.push_str(&format!("  対象: {}\n", times.join(LIST_SEPARATOR)));
    }
    out.push_str(&format!("  天気: {}\n", row.weather_text.join(LIST_SEPARATOR)));
    out.push_str(&format!("  風: {}\n", row.wind_text.join(LIST_SEPARATOR)));

    let pops: Vec<String> = row
        .precipitation_probability
        .iter()
        .map(|p| percent(p))
        .collect();
    out.push_str(&format!("  降水確率: {}\n", pops.join(LIST_SEPARATOR)));
    out.push_str(&format!("  気温: {}\n", row.temperatures.join(LIST_SEPARATOR)));
    if row.has_temperature_range() {
        out.push_str(&format!(
            "  最低気温: {} °C  最高気温: {} °C\n",
            row.temperature_min, row.temperature_max
        ));
    }
    out.push('\n');
    out
}

/// Summary view: one line per row built from the first value of each list.
pub fn render_summary(rows: &[NormalizedForecastRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }

    rows.iter()
        .map(|row| {
            format!(
                "{} - {}: 天気: {} | 風: {} | 降水確率: {}% | 気温: {} °C\n",
                row.area_name,
                format_time(&row.report_time),
                first(&row.weather_text),
                first(&row.wind_text),
                first(&row.precipitation_probability),
                first(&row.temperatures),
            )
        })
        .collect()
}

pub fn render_json(rows: &[NormalizedForecastRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Numbered catalog listing. Numbers match the positions in
/// [`AreaCatalog::choices`], starting from 1.
pub fn render_catalog(catalog: &AreaCatalog) -> String {
    if catalog.is_empty() {
        return "地域情報がありません\n".to_string();
    }

    let mut out = String::new();
    let mut index = 1;
    for center in catalog.iter() {
        let mut heading = center.name.clone();
        if let Some(en) = &center.en_name {
            heading.push_str(&format!(" / {}", en));
        }
        heading.push_str(&format!(" ({})", center.code));
        if let Some(office) = &center.office_name {
            heading.push_str(&format!(" {}", office));
        }
        out.push_str(&heading);
        out.push('\n');

        for child in &center.children {
            out.push_str(&format!("  {:>3}) {}\n", index, child));
            index += 1;
        }
    }
    out
}

pub fn render_history(stored: &[StoredForecast]) -> String {
    if stored.is_empty() {
        return format!("{}\n", NO_DATA_MESSAGE);
    }

    stored
        .iter()
        .map(|s| {
            let temperature = s
                .record
                .temperature
                .map(|t| format!("{} °C", t))
                .unwrap_or_else(|| "-".to_string());
            let pop = s
                .record
                .precipitation_probability
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "#{} {} {}: 天気: {} | 風: {} | 降水確率: {} | 気温: {}\n",
                s.id,
                s.area_name,
                format_time(&s.record.forecast_date),
                s.record.weather,
                s.record.wind,
                pop,
                temperature,
            )
        })
        .collect()
}

/// Areas present in the database, followed by the total row count.
pub fn render_stored_areas(areas: &[AreaRecord], forecast_count: u32) -> String {
    if areas.is_empty() {
        return "保存された予報はありません\n".to_string();
    }

    let mut out: String = areas
        .iter()
        .map(|a| format!("{} {}\n", a.code, a.name))
        .collect();
    out.push_str(&format!("保存済み予報: {} 件\n", forecast_count));
    out
}
