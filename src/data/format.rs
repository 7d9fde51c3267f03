//! Display formatting for readings: units and localized timestamps.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::reading::Reading;

/// Time zone readings are shown in unless configured otherwise.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Jakarta;

/// Placeholder for a missing value.
const MISSING: &str = "-";

/// Column headers of the formatted history table and document export.
pub const HEADERS: [&str; 5] = ["Timestamp", "Soil Moisture", "pH", "Humidity", "Temperature"];

/// Format a timestamp in the given zone as `dd/mm/yyyy, HH.MM.SS`.
pub fn format_timestamp(ts: Option<DateTime<Utc>>, tz: Tz) -> String {
    match ts {
        Some(ts) => ts.with_timezone(&tz).format("%d/%m/%Y, %H.%M.%S").to_string(),
        None => MISSING.to_string(),
    }
}

/// Format a value without trailing zeros (`25`, `5.5`, `28.75`).
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => trim_number(v),
        None => MISSING.to_string(),
    }
}

/// Format a value followed by its unit, e.g. `42%` or `28.5°C`.
pub fn format_with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", trim_number(v), unit),
        None => MISSING.to_string(),
    }
}

fn trim_number(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// One reading as the five display cells of the history table.
pub fn format_row(reading: &Reading, tz: Tz) -> [String; 5] {
    [
        format_timestamp(reading.timestamp, tz),
        format_with_unit(reading.soil_moisture, "%"),
        format_value(reading.ph),
        format_with_unit(reading.humidity, "%"),
        format_with_unit(reading.temperature, "°C"),
    ]
}

/// Parse an IANA time zone name.
pub fn parse_timezone(name: &str) -> anyhow::Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("Unknown time zone '{}': {}", name, e))
}
