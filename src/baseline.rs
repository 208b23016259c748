use crate::error::{PipelineError, Result};
use crate::structs::{DailyRecord, MonthlyBaseline};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Monthly normals for every calendar month present in a dataset, keyed by month (1-12).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MonthlyBaselines(BTreeMap<u32, MonthlyBaseline>);

impl MonthlyBaselines {
    pub fn get(&self, month: u32) -> Option<&MonthlyBaseline> {
        self.0.get(&month)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyBaseline> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Computes per-month baselines over the full dataset.
///
/// Records are grouped by calendar month regardless of year. Missing mean
/// temperatures are skipped, so `sample_count` only counts defined samples.
/// Each month is reduced on its own rayon task, but the samples of a month are
/// always summed in input order, so repeated runs are bit-identical.
///
/// # Errors
///
/// Returns `PipelineError::EmptyDataset` if `records` is empty.
pub fn compute_baselines(records: &[DailyRecord]) -> Result<MonthlyBaselines> {
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in records {
        let samples = by_month.entry(record.month).or_default();
        if let Some(t) = record.mean_temp {
            samples.push(t);
        }
    }

    let baselines: BTreeMap<u32, MonthlyBaseline> = by_month
        .into_par_iter()
        .map(|(month, samples)| (month, month_baseline(month, &samples)))
        .collect();

    debug!("Computed baselines for {} calendar months", baselines.len());
    Ok(MonthlyBaselines(baselines))
}

/// Copies each record's monthly baseline onto it.
///
/// Runs only after `compute_baselines` has seen every record.
pub fn attach_baselines(records: &mut [DailyRecord], baselines: &MonthlyBaselines) {
    for record in records.iter_mut() {
        let baseline = baselines.get(record.month);
        record.baseline_mean = baseline.and_then(|b| b.sample_mean);
        record.baseline_std = baseline.and_then(|b| b.sample_std);
    }
}

/// Sample mean and sample standard deviation (N-1 denominator) of one month.
fn month_baseline(month: u32, samples: &[f64]) -> MonthlyBaseline {
    let n = samples.len();
    let sample_mean = if n == 0 {
        None
    } else {
        Some(samples.iter().sum::<f64>() / n as f64)
    };

    let sample_std = match sample_mean {
        Some(mean) if n > 1 => {
            let variance =
                samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(variance.sqrt())
        }
        _ => None,
    };

    MonthlyBaseline {
        month,
        sample_mean,
        sample_std,
        sample_count: n as u32,
    }
}
