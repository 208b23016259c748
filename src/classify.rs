use crate::structs::{Classification, DailyRecord, EngineConfig, ZScore};
use log::debug;

/// Standardized deviation of `mean_temp` from its baseline.
///
/// Undefined when any input is missing or the baseline has zero spread.
pub fn z_score(
    mean_temp: Option<f64>,
    baseline_mean: Option<f64>,
    baseline_std: Option<f64>,
) -> ZScore {
    match (mean_temp, baseline_mean, baseline_std) {
        (Some(t), Some(mean), Some(std)) if std > 0.0 => ZScore::from(Some((t - mean) / std)),
        _ => ZScore::Undefined,
    }
}

/// Maps a z-score onto an anomaly label using the configured thresholds.
pub fn classify(z: ZScore, config: &EngineConfig) -> Classification {
    match z {
        ZScore::Undefined => Classification::Normal,
        ZScore::Defined(z) if z > config.heat_wave_z => Classification::HeatWave,
        ZScore::Defined(z) if z < config.cold_snap_z => Classification::ColdSnap,
        ZScore::Defined(_) => Classification::Normal,
    }
}

/// Fills `z_score` and `classification` on records that already carry a baseline.
pub fn classify_records(records: &mut [DailyRecord], config: &EngineConfig) {
    let mut undefined = 0usize;
    for record in records.iter_mut() {
        record.z_score = z_score(record.mean_temp, record.baseline_mean, record.baseline_std);
        record.classification = classify(record.z_score, config);
        if !record.z_score.is_defined() {
            undefined += 1;
        }
    }
    if undefined > 0 {
        debug!(
            "{} of {} records have an undefined z-score and default to Normal",
            undefined,
            records.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strict() {
        let config = EngineConfig::default();
        assert_eq!(classify(ZScore::Defined(2.0), &config), Classification::Normal);
        assert_eq!(classify(ZScore::Defined(2.01), &config), Classification::HeatWave);
        assert_eq!(classify(ZScore::Defined(-2.0), &config), Classification::Normal);
        assert_eq!(classify(ZScore::Defined(-2.01), &config), Classification::ColdSnap);
        assert_eq!(classify(ZScore::Undefined, &config), Classification::Normal);
    }

    #[test]
    fn thresholds_follow_config() {
        let config = EngineConfig {
            heat_wave_z: 1.0,
            cold_snap_z: -1.5,
            ..EngineConfig::default()
        };
        assert_eq!(classify(ZScore::Defined(1.2), &config), Classification::HeatWave);
        assert_eq!(classify(ZScore::Defined(-1.2), &config), Classification::Normal);
        assert_eq!(classify(ZScore::Defined(-1.6), &config), Classification::ColdSnap);
    }

    #[test]
    fn z_score_is_undefined_without_spread() {
        assert_eq!(z_score(Some(10.0), Some(10.0), Some(0.0)), ZScore::Undefined);
        assert_eq!(z_score(Some(10.0), Some(8.0), None), ZScore::Undefined);
        assert_eq!(z_score(None, Some(8.0), Some(1.0)), ZScore::Undefined);
        assert_eq!(z_score(Some(10.0), Some(8.0), Some(4.0)), ZScore::Defined(0.5));
    }
}
