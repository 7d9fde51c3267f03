//! Layered runtime configuration.
//!
//! Built-in defaults, then an optional settings file, then `SOILWATCH_*`
//! environment variables (nested keys separated by `__`, e.g.
//! `SOILWATCH_API__POLL_INTERVAL_SECS=30`). Command-line flags are applied
//! on top by the binary.
//!
//! The file format follows the extension (`.toml`, `.yaml`, `.json`); a file
//! without one is read as TOML.
//!
//! ```toml
//! [api]
//! readings_url = "https://api-simotan.online/api/data"
//! pump_url = "http://localhost:3000/api/pump"
//! poll_interval_secs = 60
//! timeout_secs = 10
//!
//! [alerts]
//! soil_moisture_min = 30.0
//! ph_min = 6.0
//!
//! [history]
//! page_size = 5
//! timezone = "Asia/Jakarta"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::data::format::parse_timezone;
use crate::data::page::DEFAULT_PAGE_SIZE;
use crate::data::AlertThresholds;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub alerts: AlertThresholds,
    pub history: HistorySettings,
}

/// Sensor API endpoints and polling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub readings_url: String,
    pub pump_url: String,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            readings_url: "https://api-simotan.online/api/data".to_string(),
            pump_url: "http://localhost:3000/api/pump".to_string(),
            poll_interval_secs: 60,
            timeout_secs: 10,
        }
    }
}

impl ApiSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// History table settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub page_size: usize,
    pub timezone: String,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            timezone: "Asia/Jakarta".to_string(),
        }
    }
}

impl HistorySettings {
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}

impl Settings {
    /// Load settings from an optional file and the environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            let mut file = File::from(path);
            if path.extension().is_none() {
                file = file.format(FileFormat::Toml);
            }
            builder = builder.add_source(file.required(false));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("SOILWATCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the dashboard cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.api.poll_interval_secs == 0 {
            bail!("api.poll_interval_secs must be at least 1");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be at least 1");
        }
        if self.history.page_size == 0 {
            bail!("history.page_size must be at least 1");
        }
        self.history.tz()?;
        Ok(())
    }
}
