use crate::error::{PipelineError, Result};
use crate::structs::{Classification, DailyRecord, RawObservation, ZScore};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;

/// Accepted date layouts, tried in order. Day-first unless the year leads.
pub const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

/// Timestamp layouts; only the calendar day is kept.
pub const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Turns raw observations into `DailyRecord`s with mean temperature and
/// calendar fields populated.
///
/// Output is 1:1 with the input and keeps its order. Derived columns owned by
/// later stages start out empty (no baseline, undefined z-score, `Normal`,
/// no streak).
///
/// # Errors
///
/// Returns `PipelineError::InvalidRecord` for the first observation whose date
/// cannot be parsed or whose temperature is NaN/infinite. Nothing is returned
/// for the rest of the batch in that case.
pub fn normalize(observations: &[RawObservation]) -> Result<Vec<DailyRecord>> {
    let records = observations
        .iter()
        .enumerate()
        .map(|(index, obs)| normalize_one(index, obs))
        .collect::<Result<Vec<_>>>()?;

    debug!("Normalized {} observations", records.len());
    Ok(records)
}

fn normalize_one(index: usize, obs: &RawObservation) -> Result<DailyRecord> {
    let date = parse_date(&obs.date).ok_or_else(|| {
        let reason = if obs.date.trim().is_empty() {
            "missing date".to_string()
        } else {
            format!("unrecognised date format (expected one of {:?})", DATE_FORMATS)
        };
        PipelineError::invalid_record(index, obs.date.as_str(), reason)
    })?;

    let min_temp = check_temp(index, obs, "min_temp", obs.min_temp)?;
    let max_temp = check_temp(index, obs, "max_temp", obs.max_temp)?;

    Ok(DailyRecord {
        date,
        min_temp,
        max_temp,
        mean_temp: mean_temp(min_temp, max_temp),
        year: date.year(),
        month: date.month(),
        baseline_mean: None,
        baseline_std: None,
        z_score: ZScore::Undefined,
        classification: Classification::Normal,
        is_hot: false,
        is_cold: false,
        hot_streak: 0,
        cold_streak: 0,
    })
}

/// Parses a date string against `DATE_FORMATS`, then `DATETIME_FORMATS`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn check_temp(
    index: usize,
    obs: &RawObservation,
    field: &str,
    value: Option<f64>,
) -> Result<Option<f64>> {
    match value {
        Some(t) if !t.is_finite() => Err(PipelineError::invalid_record(
            index,
            obs.date.as_str(),
            format!("{} is not a number: {}", field, t),
        )),
        other => Ok(other),
    }
}

/// Mean of the daily minimum and maximum. Missing if either reading is.
pub fn mean_temp(min_temp: Option<f64>, max_temp: Option<f64>) -> Option<f64> {
    Some((min_temp? + max_temp?) / 2.0)
}
