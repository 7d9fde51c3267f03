//! Threshold alerts derived from the latest reading.
//!
//! Evaluation is a pure function of one [`Reading`] and the configured
//! [`AlertThresholds`]. Delivery goes through the [`Notifier`] trait so the
//! evaluation does not care whether alerts end up as toasts or log lines.

use serde::Deserialize;

use super::reading::{latest, Reading};

/// Limits below which a reading raises an alert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Soil moisture percentage below which an error is raised.
    pub soil_moisture_min: f64,
    /// Soil pH below which a warning is raised.
    pub ph_min: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            soil_moisture_min: 30.0,
            ph_min: 6.0,
        }
    }
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Warning => "WARN",
            Severity::Error => "ERR",
        }
    }
}

/// Which measurement an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    SoilMoisture,
    Ph,
}

/// A user-facing warning for one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
}

/// Receives alerts as they are produced.
pub trait Notifier {
    fn notify(&mut self, alert: &Alert);
}

/// Emits alerts as `tracing` events.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, alert: &Alert) {
        match alert.severity {
            Severity::Error => tracing::error!(kind = ?alert.kind, "{}", alert.message),
            Severity::Warning => tracing::warn!(kind = ?alert.kind, "{}", alert.message),
        }
    }
}

impl Notifier for Vec<Alert> {
    fn notify(&mut self, alert: &Alert) {
        self.push(alert.clone());
    }
}

/// Evaluate one reading against the thresholds.
///
/// The two checks are independent; a missing value never fires.
pub fn evaluate(reading: &Reading, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if reading.soil_moisture.is_some_and(|m| m < thresholds.soil_moisture_min) {
        alerts.push(Alert {
            kind: AlertKind::SoilMoisture,
            severity: Severity::Error,
            message: format!("soil moisture below {}%", thresholds.soil_moisture_min),
        });
    }

    if reading.ph.is_some_and(|ph| ph < thresholds.ph_min) {
        alerts.push(Alert {
            kind: AlertKind::Ph,
            severity: Severity::Warning,
            message: format!("soil pH too low (below {})", thresholds.ph_min),
        });
    }

    alerts
}

/// Evaluate the latest reading of a newest-first list and deliver the
/// resulting alerts. Does nothing for an empty list.
///
/// Returns the number of alerts delivered.
pub fn notify_latest(
    readings: &[Reading],
    thresholds: &AlertThresholds,
    notifier: &mut dyn Notifier,
) -> usize {
    let Some(reading) = latest(readings) else {
        return 0;
    };

    let alerts = evaluate(reading, thresholds);
    for alert in &alerts {
        notifier.notify(alert);
    }
    alerts.len()
}
