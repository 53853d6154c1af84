//! Trend statistics over an exercise's session history.
//!
//! Every function expects performances sorted ascending by date and is total:
//! degenerate input yields 0.0 rather than an error.

use serde::{Deserialize, Serialize};

use crate::models::ExercisePerformance;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub sessions: usize,
    pub volume_trend: f64,
    pub completion_rate: f64,
    pub intensity_trend: f64,
}

impl TrendSummary {
    pub fn from_history(performances: &[ExercisePerformance]) -> Self {
        Self {
            sessions: performances.len(),
            volume_trend: volume_trend(performances),
            completion_rate: completion_rate(performances),
            intensity_trend: intensity_trend(performances),
        }
    }
}

/// Least-squares slope of session volume against session index.
pub fn volume_trend(performances: &[ExercisePerformance]) -> f64 {
    if performances.len() < 2 {
        return 0.0;
    }

    let n = performances.len() as f64;
    let volumes: Vec<f64> = performances
        .iter()
        .map(ExercisePerformance::total_volume)
        .collect();

    let mean_x = (n - 1.0) / 2.0;
    let mean_y = volumes.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (index, volume) in volumes.iter().enumerate() {
        let dx = index as f64 - mean_x;
        covariance += dx * (volume - mean_y);
        variance += dx * dx;
    }

    if variance.abs() < f64::EPSILON {
        return 0.0;
    }

    covariance / variance
}

/// Fraction of sets performed in full. Failed and bodyweight entries are not
/// counted on either side.
pub fn completion_rate(performances: &[ExercisePerformance]) -> f64 {
    let (completed, total) = performances
        .iter()
        .flat_map(|performance| performance.sets.iter())
        .filter(|set| set.counts_toward_stats())
        .fold((0usize, 0usize), |(completed, total), set| {
            (completed + usize::from(set.completed), total + 1)
        });

    if total == 0 {
        return 0.0;
    }

    completed as f64 / total as f64
}

/// Relative change of the two most recent sessions' mean weight over the
/// earlier sessions' mean weight. With exactly two sessions the latest is
/// compared against the first.
pub fn intensity_trend(performances: &[ExercisePerformance]) -> f64 {
    let weights: Vec<f64> = performances
        .iter()
        .filter_map(ExercisePerformance::mean_weight)
        .collect();

    if weights.len() < 2 {
        return 0.0;
    }

    let split = if weights.len() == 2 { 1 } else { weights.len() - 2 };
    let (earlier, recent) = weights.split_at(split);

    let baseline = mean(earlier);
    if baseline.abs() < f64::EPSILON {
        return 0.0;
    }

    (mean(recent) - baseline) / baseline
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutSet;
    use chrono::NaiveDate;

    fn session(day: u32, sets: &[(f64, u32, bool)]) -> ExercisePerformance {
        ExercisePerformance::new(
            "Barbell Row",
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            "Back Day",
            sets.iter()
                .map(|&(weight, reps, completed)| WorkoutSet::new(weight, reps, completed))
                .collect(),
        )
    }

    #[test]
    fn test_volume_trend_is_slope_per_session() {
        let history = vec![
            session(1, &[(50.0, 10, true)]),
            session(3, &[(55.0, 10, true)]),
            session(5, &[(60.0, 10, true)]),
        ];

        assert!((volume_trend(&history) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_volume_trend_needs_two_sessions() {
        assert_eq!(volume_trend(&[]), 0.0);
        assert_eq!(volume_trend(&[session(1, &[(50.0, 10, true)])]), 0.0);
    }

    #[test]
    fn test_completion_rate() {
        let history = vec![
            session(1, &[(50.0, 10, true), (50.0, 6, false)]),
            session(2, &[(50.0, 10, true), (50.0, 10, true), (50.0, 0, false)]),
        ];

        assert!((completion_rate(&history) - 0.75).abs() < 1e-9);
        assert_eq!(completion_rate(&[]), 0.0);
    }

    #[test]
    fn test_intensity_trend_compares_recent_pair_to_earlier_sessions() {
        let history = vec![
            session(1, &[(40.0, 10, true)]),
            session(2, &[(60.0, 10, true)]),
            session(3, &[(60.0, 10, true)]),
        ];

        assert!((intensity_trend(&history) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_intensity_trend_two_sessions_and_zero_baseline() {
        let two = vec![
            session(1, &[(50.0, 10, true)]),
            session(2, &[(55.0, 10, true)]),
        ];
        assert!((intensity_trend(&two) - 0.1).abs() < 1e-9);

        let bodyweight = vec![
            session(1, &[(0.0, 10, true)]),
            session(2, &[(0.0, 12, true)]),
        ];
        assert_eq!(intensity_trend(&bodyweight), 0.0);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let history = vec![
            session(1, &[(50.0, 8, true), (50.0, 8, true)]),
            session(2, &[(52.5, 8, true), (52.5, 6, false)]),
        ];

        assert_eq!(
            TrendSummary::from_history(&history),
            TrendSummary::from_history(&history)
        );
        assert_eq!(TrendSummary::from_history(&history).sessions, 2);
    }
}
