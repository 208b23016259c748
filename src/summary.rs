use crate::structs::{Classification, DailyRecord, EngineConfig};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single notable day, as reported in the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRef {
    pub date: NaiveDate,
    pub mean_temp: Option<f64>,
}

impl From<&DailyRecord> for DayRef {
    fn from(record: &DailyRecord) -> Self {
        Self {
            date: record.date,
            mean_temp: record.mean_temp,
        }
    }
}

/// Per-month tally of anomaly labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyCounts {
    pub normal: usize,
    pub heat_wave: usize,
    pub cold_snap: usize,
}

impl AnomalyCounts {
    fn add(&mut self, classification: Classification) {
        match classification {
            Classification::Normal => self.normal += 1,
            Classification::HeatWave => self.heat_wave += 1,
            Classification::ColdSnap => self.cold_snap += 1,
        }
    }
}

/// Aggregate report over a set of classified records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub record_count: usize,
    pub heat_waves: usize,
    pub cold_snaps: usize,
    pub hottest_day: Option<DayRef>,
    pub coldest_day: Option<DayRef>,
    /// Days at or beyond the alert position of a hot streak
    pub unusual_heat_streaks: Vec<DayRef>,
    /// Days at or beyond the alert position of a cold streak
    pub unusual_cold_streaks: Vec<DayRef>,
    pub monthly_avg_temp: BTreeMap<u32, f64>,
    pub monthly_anomalies: BTreeMap<u32, AnomalyCounts>,
    /// Streak position -> number of days holding it
    pub hot_streak_histogram: BTreeMap<u32, usize>,
    pub cold_streak_histogram: BTreeMap<u32, usize>,
}

/// Builds a `Summary` from engine output or a filtered view of it.
///
/// Hottest and coldest day are the first record reaching the extreme mean
/// temperature. Records without a mean are ignored for temperature figures but
/// still counted in the anomaly tallies.
pub fn summarize(records: &[DailyRecord], config: &EngineConfig) -> Summary {
    let mut hottest: Option<&DailyRecord> = None;
    let mut coldest: Option<&DailyRecord> = None;
    let mut monthly_sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    let mut monthly_anomalies: BTreeMap<u32, AnomalyCounts> = BTreeMap::new();
    let mut hot_streak_histogram = BTreeMap::new();
    let mut cold_streak_histogram = BTreeMap::new();
    let mut summary = Summary {
        record_count: records.len(),
        heat_waves: 0,
        cold_snaps: 0,
        hottest_day: None,
        coldest_day: None,
        unusual_heat_streaks: Vec::new(),
        unusual_cold_streaks: Vec::new(),
        monthly_avg_temp: BTreeMap::new(),
        monthly_anomalies: BTreeMap::new(),
        hot_streak_histogram: BTreeMap::new(),
        cold_streak_histogram: BTreeMap::new(),
    };

    for record in records {
        match record.classification {
            Classification::HeatWave => summary.heat_waves += 1,
            Classification::ColdSnap => summary.cold_snaps += 1,
            Classification::Normal => {}
        }
        monthly_anomalies
            .entry(record.month)
            .or_default()
            .add(record.classification);

        if let Some(t) = record.mean_temp {
            if hottest.and_then(|h| h.mean_temp).is_none_or(|best| t > best) {
                hottest = Some(record);
            }
            if coldest.and_then(|c| c.mean_temp).is_none_or(|best| t < best) {
                coldest = Some(record);
            }
            let entry = monthly_sums.entry(record.month).or_insert((0.0, 0));
            entry.0 += t;
            entry.1 += 1;
        }

        if record.hot_streak > 0 {
            *hot_streak_histogram.entry(record.hot_streak).or_insert(0) += 1;
        }
        if record.cold_streak > 0 {
            *cold_streak_histogram.entry(record.cold_streak).or_insert(0) += 1;
        }
        if record.hot_streak >= config.streak_alert_len {
            summary.unusual_heat_streaks.push(record.into());
        }
        if record.cold_streak >= config.streak_alert_len {
            summary.unusual_cold_streaks.push(record.into());
        }
    }

    summary.hottest_day = hottest.map(DayRef::from);
    summary.coldest_day = coldest.map(DayRef::from);
    summary.monthly_avg_temp = monthly_sums
        .into_iter()
        .map(|(month, (sum, n))| (month, sum / n as f64))
        .collect();
    summary.monthly_anomalies = monthly_anomalies;
    summary.hot_streak_histogram = hot_streak_histogram;
    summary.cold_streak_histogram = cold_streak_histogram;
    summary
}
