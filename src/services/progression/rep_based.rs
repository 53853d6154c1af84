use crate::models::{ActionType, ExercisePerformance, ProgressionDecision};
use crate::services::goals::format_weight;
use crate::services::ladder::{self, LADDER_CEILING, LADDER_FLOOR};
use crate::services::progression::HOLD_CONFIDENCE;

const FLAT_INCREMENT: f64 = 2.5;
const MIN_WEIGHT: f64 = 2.5;
const HOLD_RATIO: f64 = 0.8;

/// Cold-start progression on the session's average reps. The target is the
/// persisted one when given, otherwise the ladder rung the average falls on.
pub fn decide(
    exercise_name: &str,
    latest: &ExercisePerformance,
    persisted_target: Option<u32>,
) -> ProgressionDecision {
    let reps: Vec<u32> = latest
        .completed_sets()
        .filter(|set| set.reps > 0)
        .map(|set| set.reps)
        .collect();
    let current_weight = latest.working_weight();

    if reps.is_empty() {
        let target = persisted_target.unwrap_or(LADDER_FLOOR);
        return ProgressionDecision {
            exercise_name: exercise_name.to_string(),
            current_weight,
            recommended_weight: current_weight,
            current_reps: target.to_string(),
            recommended_reps: target.to_string(),
            reason: "no completed sets to progress".to_string(),
            confidence: HOLD_CONFIDENCE,
            action_type: ActionType::Maintain,
        };
    }

    let average = reps.iter().map(|&r| u64::from(r)).sum::<u64>() as f64 / reps.len() as f64;
    let target = persisted_target.unwrap_or_else(|| ladder::rung_for(average.round() as u32));

    let (weight, next_reps, action, confidence, reason) = if average >= f64::from(LADDER_CEILING)
    {
        let weight = current_weight + FLAT_INCREMENT;
        (
            weight,
            LADDER_FLOOR,
            ActionType::IncreaseWeight,
            0.9,
            format!(
                "averaged {:.1} reps; up to {}kg for {} reps",
                average,
                format_weight(weight),
                LADDER_FLOOR
            ),
        )
    } else if average >= f64::from(target) {
        let next = (target + 2).min(LADDER_CEILING);
        (
            current_weight,
            next,
            ActionType::IncreaseReps,
            0.85,
            format!("averaged {:.1} reps against {}; up to {} reps", average, target, next),
        )
    } else if average >= f64::from(target) * HOLD_RATIO {
        (
            current_weight,
            target,
            ActionType::Maintain,
            0.75,
            format!("averaged {:.1} reps against {}; holding", average, target),
        )
    } else if current_weight <= MIN_WEIGHT {
        (
            current_weight,
            target,
            ActionType::Maintain,
            HOLD_CONFIDENCE,
            format!(
                "averaged {:.1} reps against {}; already at {}kg, holding",
                average,
                target,
                format_weight(current_weight)
            ),
        )
    } else {
        let weight = (current_weight - FLAT_INCREMENT).max(MIN_WEIGHT);
        (
            weight,
            target,
            ActionType::DecreaseWeight,
            0.8,
            format!(
                "averaged {:.1} reps, under {}% of {}; down to {}kg",
                average,
                (HOLD_RATIO * 100.0) as u32,
                target,
                format_weight(weight)
            ),
        )
    };

    ProgressionDecision {
        exercise_name: exercise_name.to_string(),
        current_weight,
        recommended_weight: weight,
        current_reps: target.to_string(),
        recommended_reps: next_reps.to_string(),
        reason,
        confidence,
        action_type: action,
    }
}
