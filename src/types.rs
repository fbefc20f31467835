use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pair of coordinates. Lat and lon are stored together so a record can
/// never carry only one of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// One historical launch as loaded from the launch CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub name: String,
    /// `date_utc` exactly as it appeared in the file; shown in the table and popups.
    pub date_utc: String,
    pub timestamp: DateTime<Utc>,
    /// Derived from `timestamp` once, when the table is loaded.
    pub year: i32,
    /// `None` when the outcome is unknown / not yet resolved.
    pub success: Option<bool>,
    pub rocket: String,
    pub launchpad: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub location: Option<LatLon>,
}

/// Table view projection of a [`LaunchRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRow {
    pub name: String,
    pub date_utc: String,
    pub success: Option<bool>,
    pub rocket: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl From<&LaunchRecord> for LaunchRow {
    fn from(r: &LaunchRecord) -> Self {
        Self {
            name: r.name.clone(),
            date_utc: r.date_utc.clone(),
            success: r.success,
            rocket: r.rocket.clone(),
            temperature: r.temperature,
            humidity: r.humidity,
            wind_speed: r.wind_speed,
        }
    }
}

// ---------- Map ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerOutcome {
    Success,
    Failure,
    /// Never produced while unknown outcomes are dropped before marker
    /// construction; kept so the page can draw a third state if that changes.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub fill_color: &'static str,
    pub radius: u32,
    pub popup: String,
    pub outcome: MarkerOutcome,
}

// ---------- Prediction ----------

/// Weather inputs from the prediction form. Ranges are enforced by the page sliders.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PredictionInput {
    #[serde(default = "PredictionInput::default_temperature")]
    pub temperature: f64,
    #[serde(default = "PredictionInput::default_humidity")]
    pub humidity: i64,
    #[serde(default = "PredictionInput::default_wind_speed")]
    pub wind_speed: f64,
}

impl PredictionInput {
    pub const TEMPERATURE_RANGE: (f64, f64) = (-20.0, 50.0);
    pub const HUMIDITY_RANGE: (i64, i64) = (0, 100);
    pub const WIND_SPEED_RANGE: (f64, f64) = (0.0, 30.0);

    fn default_temperature() -> f64 {
        25.0
    }

    fn default_humidity() -> i64 {
        50
    }

    fn default_wind_speed() -> f64 {
        5.0
    }
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            temperature: Self::default_temperature(),
            humidity: Self::default_humidity(),
            wind_speed: Self::default_wind_speed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionLabel {
    Succeed,
    Fail,
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionLabel::Succeed => f.write_str("Likely to Succeed"),
            PredictionLabel::Fail => f.write_str("Likely to Fail"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub probability: f64,
    pub label: PredictionLabel,
}

impl PredictionResult {
    /// Metric text, e.g. `"73.10%"`.
    pub fn percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}
