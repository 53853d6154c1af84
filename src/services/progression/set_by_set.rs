use crate::models::{ActionType, ExercisePerformance, ProgressionDecision};
use crate::services::equipment::EquipmentClass;
use crate::services::goals::{self, SetGoal};
use crate::services::ladder;
use crate::services::progression::{HOLD_CONFIDENCE, LadderStep, ladder_step};

const MAX_TRACKED_SETS: usize = 3;

/// Progress each of the first three sets on its own, inferring every set's
/// target as the ladder rung its reps fall on.
pub fn decide(
    exercise_name: &str,
    latest: &ExercisePerformance,
    equipment: EquipmentClass,
) -> ProgressionDecision {
    let tracked: Vec<(u32, f64, u32)> = latest
        .sets
        .iter()
        .take(MAX_TRACKED_SETS)
        .zip(1u32..)
        .filter(|(set, _)| set.completed && set.reps > 0)
        .map(|(set, number)| (number, set.weight, set.reps))
        .collect();

    let Some(&(_, first_weight, _)) = tracked.first() else {
        let weight = latest.sets.first().map(|set| set.weight).unwrap_or_default();
        return ProgressionDecision {
            exercise_name: exercise_name.to_string(),
            current_weight: weight,
            recommended_weight: weight,
            current_reps: String::new(),
            recommended_reps: String::new(),
            reason: "no completed sets to progress".to_string(),
            confidence: HOLD_CONFIDENCE,
            action_type: ActionType::Maintain,
        };
    };

    let steps: Vec<(u32, LadderStep)> = tracked
        .iter()
        .map(|&(number, weight, reps)| {
            let target = ladder::rung_for(reps);
            (number, ladder_step(target, reps, weight, equipment))
        })
        .collect();

    let performed: Vec<SetGoal> = tracked
        .iter()
        .map(|&(set_number, weight, reps)| SetGoal {
            set_number,
            weight,
            reps,
        })
        .collect();

    let recommended: Vec<SetGoal> = steps
        .iter()
        .map(|(set_number, step)| SetGoal {
            set_number: *set_number,
            weight: step.weight,
            reps: step.reps,
        })
        .collect();

    let reason = steps
        .iter()
        .map(|(set_number, step)| format!("S{}: {}", set_number, step.reason))
        .collect::<Vec<_>>()
        .join("; ");

    let confidence =
        steps.iter().map(|(_, step)| step.confidence).sum::<f64>() / steps.len() as f64;

    ProgressionDecision {
        exercise_name: exercise_name.to_string(),
        current_weight: first_weight,
        recommended_weight: recommended[0].weight,
        current_reps: goals::encode(&performed),
        recommended_reps: goals::encode(&recommended),
        reason,
        confidence,
        action_type: overall_action(steps.iter().map(|(_, step)| step.action)),
    }
}

/// A weight jump on any set outranks rep gains, which outrank holding.
fn overall_action(actions: impl Iterator<Item = ActionType>) -> ActionType {
    actions
        .min_by_key(|action| match action {
            ActionType::IncreaseWeight => 0,
            ActionType::IncreaseReps => 1,
            ActionType::DecreaseWeight => 2,
            ActionType::Maintain => 3,
        })
        .unwrap_or(ActionType::Maintain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutSet;
    use crate::services::equipment::classify;
    use chrono::NaiveDate;

    fn run(name: &str, sets: Vec<WorkoutSet>) -> ProgressionDecision {
        let session = ExercisePerformance::new(
            name,
            NaiveDate::from_ymd_opt(2024, 9, 14).unwrap(),
            "Back Day",
            sets,
        );
        decide(name, &session, classify(name))
    }

    #[test]
    fn test_each_set_progresses_independently() {
        let decision = run(
            "Barbell Row",
            vec![
                WorkoutSet::new(60.0, 15, true),
                WorkoutSet::new(60.0, 10, true),
                WorkoutSet::new(60.0, 7, true),
            ],
        );

        assert_eq!(
            decision.recommended_reps,
            "S1: 62.5kg*6 | S2: 60kg*12 | S3: 60kg*9"
        );
        assert_eq!(decision.current_reps, "S1: 60kg*15 | S2: 60kg*10 | S3: 60kg*7");
        assert_eq!(decision.recommended_weight, 62.5);
        assert_eq!(decision.current_weight, 60.0);
        assert_eq!(decision.action_type, ActionType::IncreaseWeight);
        assert!(decision.reason.starts_with("S1: "));
        assert!(decision.reason.contains("; S3: 7 reps, one short of 8"));
    }

    #[test]
    fn test_only_first_three_completed_sets_are_tracked() {
        let decision = run(
            "Lat Pulldown",
            vec![
                WorkoutSet::new(50.0, 8, true),
                WorkoutSet::new(50.0, 0, false),
                WorkoutSet::new(50.0, 6, true),
                WorkoutSet::new(50.0, 6, true),
            ],
        );

        assert_eq!(decision.recommended_reps, "S1: 50kg*10 | S3: 50kg*8");
        assert_eq!(decision.action_type, ActionType::IncreaseReps);
        assert!((decision.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_recommended_weight_mirrors_first_tracked_set() {
        let decision = run(
            "Dumbbell Curl",
            vec![
                WorkoutSet::new(12.5, 4, false),
                WorkoutSet::new(10.0, 15, true),
            ],
        );

        assert_eq!(decision.recommended_reps, "S2: 12.5kg*6");
        assert_eq!(decision.recommended_weight, 12.5);
    }

    #[test]
    fn test_mid_rung_shortfall_holds_that_set() {
        let decision = run("Seated Row", vec![WorkoutSet::new(40.0, 13, true)]);

        assert_eq!(decision.recommended_reps, "S1: 40kg*15");
        assert_eq!(decision.action_type, ActionType::Maintain);
        assert_eq!(decision.confidence, 0.7);
    }

    #[test]
    fn test_no_completed_sets_holds() {
        let decision = run("Deadlift", vec![WorkoutSet::new(140.0, 0, false)]);

        assert_eq!(decision.action_type, ActionType::Maintain);
        assert_eq!(decision.recommended_weight, 140.0);
        assert!(decision.recommended_reps.is_empty());
    }

    #[test]
    fn test_goals_round_trip_through_codec() {
        let decision = run(
            "Bench Press",
            vec![
                WorkoutSet::new(80.0, 12, true),
                WorkoutSet::new(80.0, 11, true),
            ],
        );

        let parsed = goals::decode(&decision.recommended_reps).unwrap();
        assert_eq!(
            parsed,
            vec![
                SetGoal { set_number: 1, weight: 80.0, reps: 15 },
                SetGoal { set_number: 2, weight: 80.0, reps: 13 },
            ]
        );
        assert_eq!(goals::encode(&parsed), decision.recommended_reps);
    }
}
