use chrono::{Duration, NaiveDate};
use lib::{Classification, EngineConfig, PipelineError, RawObservation, ZScore, compute};

fn daily(start: &str, temps: &[(f64, f64)]) -> Vec<RawObservation> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    temps
        .iter()
        .enumerate()
        .map(|(i, (lo, hi))| {
            let date = start + Duration::days(i as i64);
            RawObservation::new(date.to_string(), *lo, *hi)
        })
        .collect()
}

fn spread(normal: (f64, f64), extremes: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut temps = vec![normal; 30 - extremes.len()];
    temps.extend_from_slice(extremes);
    temps
}

#[test]
fn mean_temperature_of_single_day() {
    let out = compute(&daily("2024-01-01", &[(10.0, 20.0)]), &EngineConfig::default()).unwrap();
    assert_eq!(out.records[0].mean_temp, Some(15.0));
}

#[test]
fn heat_wave_at_end_of_month() {
    let temps = spread((22.0, 24.0), &[(40.0, 42.0), (41.0, 43.0), (42.0, 44.0)]);
    let out = compute(&daily("2024-06-01", &temps), &EngineConfig::default()).unwrap();

    let june = out.baselines.get(6).unwrap();
    assert_eq!(june.sample_count, 30);
    assert!(june.sample_std.unwrap() > 0.0);

    let labels: Vec<_> = out.records.iter().map(|r| r.classification).collect();
    assert!(labels[..27].iter().all(|c| *c == Classification::Normal));
    assert!(labels[27..].iter().all(|c| *c == Classification::HeatWave));
}

#[test]
fn cold_snap_at_end_of_month() {
    let temps = spread((5.0, 6.0), &[(-15.0, -14.0), (-16.0, -15.0), (-17.0, -16.0)]);
    let out = compute(&daily("2024-01-01", &temps), &EngineConfig::default()).unwrap();

    let labels: Vec<_> = out.records.iter().map(|r| r.classification).collect();
    assert!(labels[..27].iter().all(|c| *c == Classification::Normal));
    assert!(labels[27..].iter().all(|c| *c == Classification::ColdSnap));
    assert_eq!(out.records[29].cold_streak, 3);
}

#[test]
fn constant_temperature_has_undefined_z_scores() {
    let input = daily("2024-03-01", &[(10.0, 10.0); 10]);
    let out = compute(&input, &EngineConfig::default()).unwrap();

    assert_eq!(out.baselines.get(3).unwrap().sample_std, Some(0.0));
    for r in &out.records {
        assert_eq!(r.z_score, ZScore::Undefined);
        assert_eq!(r.classification, Classification::Normal);
    }
}

#[test]
fn hot_streak_numbering() {
    let temps = [(32.0, 36.0), (33.0, 37.0), (34.0, 38.0), (20.0, 25.0), (21.0, 26.0)];
    let out = compute(&daily("2024-07-01", &temps), &EngineConfig::default()).unwrap();

    let means: Vec<_> = out.records.iter().map(|r| r.mean_temp.unwrap()).collect();
    assert_eq!(means, vec![34.0, 35.0, 36.0, 22.5, 23.5]);
    let streaks: Vec<_> = out.records.iter().map(|r| r.hot_streak).collect();
    assert_eq!(streaks, vec![1, 2, 3, 0, 0]);
    assert!(out.records.iter().all(|r| r.cold_streak == 0));
}

#[test]
fn single_record_dataset() {
    let out = compute(&daily("2024-01-01", &[(5.0, 10.0)]), &EngineConfig::default()).unwrap();

    assert_eq!(out.records.len(), 1);
    let r = &out.records[0];
    assert_eq!(r.baseline_mean, Some(7.5));
    assert_eq!(r.baseline_std, None);
    assert_eq!(r.z_score, ZScore::Undefined);
    assert_eq!(r.classification, Classification::Normal);
    assert_eq!((r.hot_streak, r.cold_streak), (0, 0));
}

#[test]
fn streaks_follow_row_order_across_gaps() {
    let input = vec![
        RawObservation::new("2024-07-01", 31.0, 33.0),
        RawObservation::new("2024-07-05", 31.0, 33.0),
        RawObservation::new("2024-07-02", 31.0, 33.0),
    ];
    let out = compute(&input, &EngineConfig::default()).unwrap();
    let streaks: Vec<_> = out.records.iter().map(|r| r.hot_streak).collect();
    assert_eq!(streaks, vec![1, 2, 3]);
}

#[test]
fn classification_agrees_with_z_score_everywhere() {
    // several years of a seasonal cycle with a few injected extremes
    let mut temps = Vec::new();
    for day in 0..1100 {
        let season = ((day % 365) as f64 / 365.0 * std::f64::consts::TAU).sin() * 12.0;
        let jitter = ((day * 37) % 11) as f64 * 0.4;
        let t = 12.0 + season + jitter;
        temps.push((t - 3.0, t + 3.0));
    }
    temps[200] = (45.0, 47.0);
    temps[600] = (-30.0, -28.0);
    let config = EngineConfig::default();
    let out = compute(&daily("2020-01-01", &temps), &config).unwrap();

    for b in out.baselines.iter() {
        if b.sample_count >= 2 {
            let std = b.sample_std.unwrap();
            assert!(std.is_finite() && std >= 0.0);
        }
    }
    for r in &out.records {
        assert_eq!(r.mean_temp, Some((r.min_temp.unwrap() + r.max_temp.unwrap()) / 2.0));
        let expected = match r.z_score {
            ZScore::Defined(z) if z > config.heat_wave_z => Classification::HeatWave,
            ZScore::Defined(z) if z < config.cold_snap_z => Classification::ColdSnap,
            _ => Classification::Normal,
        };
        assert_eq!(r.classification, expected);
    }
    assert_eq!(out.records[200].classification, Classification::HeatWave);
    assert_eq!(out.records[600].classification, Classification::ColdSnap);

    // streak law: runs count up from 1, zero off-run
    let mut prev = (0, 0);
    for r in &out.records {
        let hot = if r.is_hot { prev.0 + 1 } else { 0 };
        let cold = if r.is_cold { prev.1 + 1 } else { 0 };
        assert_eq!((r.hot_streak, r.cold_streak), (hot, cold));
        prev = (hot, cold);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let temps: Vec<_> = (0..400)
        .map(|i| {
            let t = (i as f64 * 0.73).sin() * 20.0 + 10.0;
            (t - 1.3, t + 2.1)
        })
        .collect();
    let input = daily("2021-01-01", &temps);
    let config = EngineConfig::default();

    let a = compute(&input, &config).unwrap();
    let b = compute(&input, &config).unwrap();
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    for (x, y) in a.records.iter().zip(&b.records) {
        assert_eq!(
            x.z_score.value().map(f64::to_bits),
            y.z_score.value().map(f64::to_bits)
        );
    }
}

#[test]
fn bad_record_aborts_whole_run() {
    let mut input = daily("2024-01-01", &[(1.0, 2.0); 5]);
    input[3].date = "31/02/2024".to_string();

    match compute(&input, &EngineConfig::default()) {
        Err(PipelineError::InvalidRecord { index, date, .. }) => {
            assert_eq!(index, 3);
            assert_eq!(date, "31/02/2024");
        }
        other => panic!("expected InvalidRecord, got {:?}", other),
    }

    input[3].date = "2024-01-04".to_string();
    input[1].max_temp = Some(f64::INFINITY);
    assert!(matches!(
        compute(&input, &EngineConfig::default()),
        Err(PipelineError::InvalidRecord { index: 1, .. })
    ));
}
