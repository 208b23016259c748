use chrono::NaiveDate;
use log::{Log, Metadata, Record as LogRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple logger implementation
pub struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &LogRecord) {
        println!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// One raw daily observation as supplied by the ingestion side.
///
/// `None` temperatures are missing readings (empty cells / nulls). They are
/// carried through as an undefined mean rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub date: String,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl RawObservation {
    pub fn new(date: impl Into<String>, min_temp: f64, max_temp: f64) -> Self {
        Self {
            date: date.into(),
            min_temp: Some(min_temp),
            max_temp: Some(max_temp),
        }
    }
}

/// Standardized deviation of a day's mean temperature from its monthly baseline.
///
/// Undefined whenever the baseline has no spread (zero or missing standard
/// deviation) or the day itself has no mean temperature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum ZScore {
    Defined(f64),
    #[default]
    Undefined,
}

impl ZScore {
    pub fn value(self) -> Option<f64> {
        match self {
            ZScore::Defined(z) => Some(z),
            ZScore::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, ZScore::Defined(_))
    }
}

impl From<Option<f64>> for ZScore {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(z) if z.is_finite() => ZScore::Defined(z),
            _ => ZScore::Undefined,
        }
    }
}

impl From<ZScore> for Option<f64> {
    fn from(value: ZScore) -> Self {
        value.value()
    }
}

/// Three-way anomaly label for a single day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Classification {
    #[default]
    Normal,
    #[serde(rename = "Heat Wave")]
    HeatWave,
    #[serde(rename = "Cold Snap")]
    ColdSnap,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Classification::Normal => "Normal",
            Classification::HeatWave => "Heat Wave",
            Classification::ColdSnap => "Cold Snap",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Daily weather record with every derived column attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub mean_temp: Option<f64>,
    pub year: i32,
    pub month: u32,
    pub baseline_mean: Option<f64>,
    pub baseline_std: Option<f64>,
    pub z_score: ZScore,
    pub classification: Classification,
    pub is_hot: bool,
    pub is_cold: bool,
    pub hot_streak: u32,
    pub cold_streak: u32,
}

/// Climatological normal for one calendar month, across all years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBaseline {
    pub month: u32,
    pub sample_mean: Option<f64>,
    pub sample_std: Option<f64>,
    pub sample_count: u32,
}

/// Configuration for classification and streak detection
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Z-score above which a day is a heat wave
    pub heat_wave_z: f64,
    /// Z-score below which a day is a cold snap
    pub cold_snap_z: f64,
    /// Mean temperature (°C) above which a day counts as hot
    pub hot_day_temp: f64,
    /// Mean temperature (°C) below which a day counts as cold
    pub cold_day_temp: f64,
    /// Minimum streak position reported as an unusual streak
    pub streak_alert_len: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heat_wave_z: 2.0,
            cold_snap_z: -2.0,
            hot_day_temp: 30.0,
            cold_day_temp: 0.0,
            streak_alert_len: 3,
        }
    }
}

/// Display filter applied to engine output, never to engine input.
///
/// An empty `years` list keeps every year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub years: Vec<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}
