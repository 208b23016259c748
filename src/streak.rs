//! Consecutive hot/cold day detection.
//!
//! Streaks follow input row order. Records are not re-sorted and calendar gaps
//! are not checked, so a run may span a missing day.

use crate::structs::{DailyRecord, EngineConfig};
use log::debug;

/// Run-length state for one boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No record seen yet.
    #[default]
    Start,
    /// Inside a run of `false` records.
    Off,
    /// Inside a run of `true` records, holding the run length so far.
    On(u32),
}

impl RunState {
    /// Advances by one record and returns its streak position (0 when the flag is off).
    pub fn step(&mut self, flag: bool) -> u32 {
        let next = match (*self, flag) {
            (_, false) => RunState::Off,
            (RunState::On(n), true) => RunState::On(n + 1),
            (RunState::Start | RunState::Off, true) => RunState::On(1),
        };
        *self = next;
        match next {
            RunState::On(n) => n,
            RunState::Start | RunState::Off => 0,
        }
    }
}

/// Streak position of every element of a flag sequence.
pub fn streak_positions<I>(flags: I) -> Vec<u32>
where
    I: IntoIterator<Item = bool>,
{
    let mut state = RunState::Start;
    flags.into_iter().map(|flag| state.step(flag)).collect()
}

pub fn is_hot(mean_temp: Option<f64>, config: &EngineConfig) -> bool {
    mean_temp.is_some_and(|t| t > config.hot_day_temp)
}

pub fn is_cold(mean_temp: Option<f64>, config: &EngineConfig) -> bool {
    mean_temp.is_some_and(|t| t < config.cold_day_temp)
}

/// Sets `is_hot`/`is_cold` and numbers both kinds of streak, in one pass.
pub fn detect_streaks(records: &mut [DailyRecord], config: &EngineConfig) {
    let mut hot = RunState::Start;
    let mut cold = RunState::Start;
    let mut longest = (0u32, 0u32);

    for record in records.iter_mut() {
        record.is_hot = is_hot(record.mean_temp, config);
        record.is_cold = is_cold(record.mean_temp, config);
        record.hot_streak = hot.step(record.is_hot);
        record.cold_streak = cold.step(record.is_cold);
        longest.0 = longest.0.max(record.hot_streak);
        longest.1 = longest.1.max(record.cold_streak);
    }

    debug!(
        "Longest hot streak: {} day(s), longest cold streak: {} day(s)",
        longest.0, longest.1
    );
}
