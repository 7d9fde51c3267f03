//! Sensor reading model.
//!
//! These types match the JSON produced by the sensor API. They are the common
//! data format between every [`DataSource`](crate::source::DataSource) and the
//! derived views.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One sensor snapshot.
///
/// Every field is optional: the API gives no guarantees beyond the field
/// names, and missing or `null` values are passed through to rendering as
/// `None` rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the snapshot was recorded.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Soil moisture in percent (0–100).
    #[serde(default)]
    pub soil_moisture: Option<f64>,

    /// Soil pH (0–14).
    #[serde(default, rename = "pH")]
    pub ph: Option<f64>,

    /// Air humidity in percent (0–100).
    #[serde(default)]
    pub humidity: Option<f64>,

    /// Air temperature in degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl Reading {
    /// Build a reading with every measurement present and no timestamp.
    pub fn new(soil_moisture: f64, ph: f64, humidity: f64, temperature: f64) -> Self {
        Self {
            timestamp: None,
            soil_moisture: Some(soil_moisture),
            ph: Some(ph),
            humidity: Some(humidity),
            temperature: Some(temperature),
        }
    }

    /// Attach a timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// The latest reading of a list ordered newest-first.
pub fn latest(readings: &[Reading]) -> Option<&Reading> {
    readings.first()
}

/// Pump on/off state as reported by the pump status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpState {
    pub status: bool,
}

impl PumpState {
    pub fn label(&self) -> &'static str {
        if self.status {
            "ON"
        } else {
            "OFF"
        }
    }
}

/// Accepts RFC 3339, naive date-times (as UTC) and epoch milliseconds.
/// Anything else yields `None` instead of failing the whole response.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        serde_json::Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_reading() {
        let json = r#"{
            "timestamp": "2024-10-01T03:15:00.000Z",
            "soil_moisture": 42.5,
            "pH": 6.8,
            "humidity": 71,
            "temperature": 29.4
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.soil_moisture, Some(42.5));
        assert_eq!(reading.ph, Some(6.8));
        assert_eq!(reading.humidity, Some(71.0));
        assert_eq!(reading.temperature, Some(29.4));
        assert_eq!(
            reading.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 10, 1, 3, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_and_null_fields_pass_through() {
        let json = r#"{ "soil_moisture": null, "humidity": 60 }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert!(reading.timestamp.is_none());
        assert!(reading.soil_moisture.is_none());
        assert!(reading.ph.is_none());
        assert_eq!(reading.humidity, Some(60.0));
    }

    #[test]
    fn test_naive_and_epoch_timestamps() {
        let naive: Reading = serde_json::from_str(r#"{"timestamp":"2024-10-01 03:15:00"}"#).unwrap();
        assert_eq!(
            naive.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 10, 1, 3, 15, 0).unwrap())
        );

        let epoch: Reading = serde_json::from_str(r#"{"timestamp":1727752500000}"#).unwrap();
        assert_eq!(
            epoch.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 10, 1, 3, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_unparseable_timestamp_does_not_fail_list() {
        let json = r#"[{"timestamp":"yesterday","pH":7}, {"pH":6.5}]"#;

        let readings: Vec<Reading> = serde_json::from_str(json).unwrap();
        assert_eq!(readings.len(), 2);
        assert!(readings[0].timestamp.is_none());
        assert_eq!(readings[0].ph, Some(7.0));
    }

    #[test]
    fn test_latest_is_first() {
        let readings = vec![Reading::new(10.0, 6.0, 50.0, 20.0), Reading::new(90.0, 7.0, 50.0, 20.0)];
        assert_eq!(latest(&readings).unwrap().soil_moisture, Some(10.0));
        assert!(latest(&[]).is_none());
    }

    #[test]
    fn test_pump_state() {
        let state: PumpState = serde_json::from_str(r#"{"status":true}"#).unwrap();
        assert!(state.status);
        assert_eq!(state.label(), "ON");
        assert_eq!(PumpState::default().label(), "OFF");
    }
}
