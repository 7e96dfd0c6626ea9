//! Derived read-side metrics. Everything here is a pure function over a
//! key-sorted journal slice; nothing mutates or persists.

use serde::{Deserialize, Serialize};
use time::Date;

/// Daily sitting budget in minutes.
pub const DAILY_SITTING_LIMIT_MINUTES: u32 = 480;

/// Nightly sleep target in hours.
pub const RECOMMENDED_SLEEP_HOURS: f64 = 8.0;

/// Category label for a night's sleep duration. The bands are exhaustive and
/// non-overlapping: below 6 h, [6, 7), [7, 9], above 9 h.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum SleepBand {
    Insufficient,
    Adequate,
    Optimal,
    Excessive,
}

impl SleepBand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insufficient => "Insufficient",
            Self::Adequate => "Adequate",
            Self::Optimal => "Optimal",
            Self::Excessive => "Excessive",
        }
    }
}

#[must_use]
pub fn sleep_band(hours: f64) -> SleepBand {
    if (7.0..=9.0).contains(&hours) {
        SleepBand::Optimal
    } else if hours > 9.0 {
        SleepBand::Excessive
    } else if hours >= 6.0 {
        SleepBand::Adequate
    } else {
        SleepBand::Insufficient
    }
}

/// Mean of `value` over the last `n` records. An empty journal (or a zero
/// window) averages to `0.0` rather than dividing by zero.
pub fn average_recent<R>(records: &[R], n: usize, value: impl Fn(&R) -> f64) -> f64 {
    let start = records.len().saturating_sub(n);
    let window = &records[start..];
    if window.is_empty() {
        return 0.0;
    }
    let total: f64 = window.iter().map(value).sum();
    total / window.len() as f64
}

/// Share of a threshold reached, as a percentage clamped to `[0, 100]`.
/// A non-positive threshold reads as no progress.
#[must_use]
pub fn progress_percent(value: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    ((value / threshold) * 100.0).clamp(0.0, 100.0)
}

/// Render a minute count the way the trackers display it: "2 hr 30 min",
/// "2 hr", or "45 min".
#[must_use]
pub fn duration_label(minutes: u32) -> String {
    let hours = minutes / 60;
    let remainder = minutes % 60;
    match (hours, remainder) {
        (0, _) => format!("{remainder} min"),
        (_, 0) => format!("{hours} hr"),
        _ => format!("{hours} hr {remainder} min"),
    }
}

/// Length of the run of qualifying records on consecutive calendar days,
/// scanning backward from the most recent record. A disqualifying record or
/// a gap day ends the run.
pub fn daily_streak<R>(
    records: &[R],
    date_of: impl Fn(&R) -> Date,
    qualifies: impl Fn(&R) -> bool,
) -> usize {
    let mut streak = 0;
    let mut expected: Option<Date> = None;
    for record in records.iter().rev() {
        if !qualifies(record) {
            break;
        }
        let date = date_of(record);
        if let Some(expected) = expected {
            if date != expected {
                break;
            }
        }
        streak += 1;
        match date.previous_day() {
            Some(previous) => expected = Some(previous),
            None => break,
        }
    }
    streak
}
