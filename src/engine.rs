use crate::baseline::{MonthlyBaselines, attach_baselines, compute_baselines};
use crate::classify::classify_records;
use crate::error::Result;
use crate::normalize::normalize;
use crate::streak::detect_streaks;
use crate::structs::{DailyRecord, EngineConfig, FilterCriteria, RawObservation};
use chrono::Datelike;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Augmented records plus the baselines they were classified against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineOutput {
    pub records: Vec<DailyRecord>,
    pub baselines: MonthlyBaselines,
}

/// Classifies a complete, ordered dataset and numbers its hot/cold streaks.
///
/// Stages run strictly in sequence over the whole dataset: normalize, compute
/// monthly baselines, attach them, classify by z-score, detect streaks. The
/// input is never re-sorted; streaks follow the order given here.
///
/// Baselines depend on every record passed in. To look at a subset, run this
/// on everything and then call [`EngineOutput::filter`].
///
/// # Errors
///
/// - `PipelineError::InvalidRecord` if any observation fails normalization
/// - `PipelineError::EmptyDataset` if `observations` is empty
pub fn compute(observations: &[RawObservation], config: &EngineConfig) -> Result<EngineOutput> {
    let start = Instant::now();

    let mut records = normalize(observations)?;
    let baselines = compute_baselines(&records)?;
    attach_baselines(&mut records, &baselines);
    classify_records(&mut records, config);
    detect_streaks(&mut records, config);

    debug!(
        "Engine processed {} records across {} months in {:.2?}",
        records.len(),
        baselines.len(),
        start.elapsed()
    );
    Ok(EngineOutput { records, baselines })
}

impl EngineOutput {
    /// Display view of the records matching `criteria`, in input order.
    ///
    /// Derived columns are copied as computed on the full dataset.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<DailyRecord> {
        let view: Vec<DailyRecord> = self
            .records
            .iter()
            .filter(|r| criteria.matches(r))
            .cloned()
            .collect();
        debug!(
            "Filter kept {} of {} records",
            view.len(),
            self.records.len()
        );
        view
    }
}

impl FilterCriteria {
    pub fn matches(&self, record: &DailyRecord) -> bool {
        (self.years.is_empty() || self.years.contains(&record.year))
            && self.month.is_none_or(|m| record.month == m)
            && self.day.is_none_or(|d| record.date.day() == d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn obs(date: &str, t: f64) -> RawObservation {
        RawObservation::new(date, t, t)
    }

    #[test]
    fn output_preserves_length_and_order() {
        let input = vec![
            obs("2024-01-03", 1.0),
            obs("2024-01-01", 2.0),
            obs("2024-01-02", 3.0),
        ];
        let out = compute(&input, &EngineConfig::default()).unwrap();
        let days: Vec<u32> = out.records.iter().map(|r| r.date.day()).collect();
        assert_eq!(days, vec![3, 1, 2]);
    }

    #[test]
    fn filter_keeps_full_dataset_baselines() {
        let mut input: Vec<_> = (1..=28)
            .map(|d| obs(&format!("2023-02-{:02}", d), 5.0 + (d % 3) as f64))
            .collect();
        input.push(obs("2024-02-01", 25.0));

        let config = EngineConfig::default();
        let out = compute(&input, &config).unwrap();
        let view = out.filter(&FilterCriteria {
            years: vec![2024],
            ..FilterCriteria::default()
        });

        assert_eq!(view.len(), 1);
        assert_eq!(&view[0], out.records.last().unwrap());
        assert_eq!(view[0].classification, crate::structs::Classification::HeatWave);

        // re-running on the subset would leave a single-sample month
        let subset = compute(&input[28..], &config).unwrap();
        assert_eq!(subset.records[0].baseline_std, None);
    }

    #[test]
    fn filter_by_month_and_day() {
        let input = vec![
            obs("2023-03-15", 1.0),
            obs("2023-04-15", 1.0),
            obs("2024-03-15", 1.0),
            obs("2024-03-16", 1.0),
        ];
        let out = compute(&input, &EngineConfig::default()).unwrap();
        let view = out.filter(&FilterCriteria {
            years: Vec::new(),
            month: Some(3),
            day: Some(15),
        });
        let years: Vec<i32> = view.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2023, 2024]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            compute(&[], &EngineConfig::default()),
            Err(PipelineError::EmptyDataset)
        ));
    }
}
