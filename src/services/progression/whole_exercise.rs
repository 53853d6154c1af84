use crate::models::{ActionType, ExercisePerformance, ProgressionDecision};
use crate::services::equipment::EquipmentClass;
use crate::services::progression::{
    ASSUMED_TARGET_CONFIDENCE, DEFAULT_TARGET_REPS, HOLD_CONFIDENCE, RepTarget, ladder_step,
};

/// Move the whole exercise along the rep ladder based on the weakest
/// completed set of the latest session.
pub fn decide(
    exercise_name: &str,
    latest: &ExercisePerformance,
    target: RepTarget,
    equipment: EquipmentClass,
) -> ProgressionDecision {
    let total_sets = latest.sets.len();
    let completed: Vec<_> = latest.completed_sets().collect();
    let current_weight = if completed.is_empty() {
        latest.sets.iter().map(|set| set.weight).fold(0.0, f64::max)
    } else {
        latest.working_weight()
    };

    let min_reps = completed.iter().map(|set| set.reps).min();

    let mut decision = match min_reps {
        Some(min_reps) if completed.len() == total_sets => {
            let step = ladder_step(target.reps, min_reps, current_weight, equipment);
            ProgressionDecision {
                exercise_name: exercise_name.to_string(),
                current_weight,
                recommended_weight: step.weight,
                current_reps: target.reps.to_string(),
                recommended_reps: step.reps.to_string(),
                reason: step.reason,
                confidence: step.confidence,
                action_type: step.action,
            }
        }
        _ => ProgressionDecision {
            exercise_name: exercise_name.to_string(),
            current_weight,
            recommended_weight: current_weight,
            current_reps: target.reps.to_string(),
            recommended_reps: target.reps.to_string(),
            reason: format!(
                "not all sets completed ({} of {})",
                completed.len(),
                total_sets
            ),
            confidence: HOLD_CONFIDENCE,
            action_type: ActionType::Maintain,
        },
    };

    if target.assumed {
        decision.confidence = decision.confidence.min(ASSUMED_TARGET_CONFIDENCE);
        decision.reason = format!(
            "{}; no rep target on record, assumed {}",
            decision.reason, DEFAULT_TARGET_REPS
        );
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutSet;
    use crate::services::equipment::classify;
    use chrono::NaiveDate;

    fn latest(name: &str, sets: &[(f64, u32)]) -> ExercisePerformance {
        ExercisePerformance::new(
            name,
            NaiveDate::from_ymd_opt(2024, 9, 12).unwrap(),
            "Full Body",
            sets.iter()
                .map(|&(weight, reps)| WorkoutSet::new(weight, reps, true))
                .collect(),
        )
    }

    fn run(name: &str, sets: &[(f64, u32)], target: u32) -> ProgressionDecision {
        decide(name, &latest(name, sets), RepTarget::known(target), classify(name))
    }

    #[test]
    fn test_high_reps_move_weight_up_and_reset() {
        let decision = run("Barbell Row", &[(60.0, 15), (60.0, 14), (60.0, 16)], 6);

        assert_eq!(decision.action_type, ActionType::IncreaseWeight);
        assert_eq!(decision.recommended_weight, 62.5);
        assert_eq!(decision.recommended_reps, "6");
        assert_eq!(decision.confidence, 0.95);
    }

    #[test]
    fn test_high_reps_on_dumbbell_follow_table() {
        let decision = run("Dumbbell Press", &[(22.5, 15), (22.5, 15)], 15);

        assert_eq!(decision.action_type, ActionType::IncreaseWeight);
        assert_eq!(decision.recommended_weight, 25.0);
        assert_eq!(decision.recommended_reps, "6");
    }

    #[test]
    fn test_target_hit_climbs_ladder() {
        let decision = run("Bench Press", &[(80.0, 10), (80.0, 10), (80.0, 10)], 10);

        assert_eq!(decision.action_type, ActionType::IncreaseReps);
        assert_eq!(decision.recommended_reps, "12");
        assert_eq!(decision.recommended_weight, 80.0);
        assert_eq!(decision.current_reps, "10");
        assert_eq!(decision.confidence, 0.9);
    }

    #[test]
    fn test_weakest_set_decides_step_size() {
        let decision = run("Bench Press", &[(80.0, 10), (80.0, 10), (80.0, 9)], 10);

        assert_eq!(decision.action_type, ActionType::IncreaseReps);
        assert_eq!(decision.recommended_reps, "11");
        assert_eq!(decision.recommended_weight, 80.0);
    }

    #[test]
    fn test_top_rung_hit_moves_to_ceiling() {
        let decision = run("Machine Chest Press", &[(45.0, 12), (45.0, 13)], 12);

        assert_eq!(decision.action_type, ActionType::IncreaseReps);
        assert_eq!(decision.recommended_reps, "15");
    }

    #[test]
    fn test_near_miss_adds_one_rep() {
        let decision = run("Barbell Curl", &[(50.0, 8), (50.0, 7), (50.0, 8)], 8);

        assert_eq!(decision.action_type, ActionType::IncreaseReps);
        assert_eq!(decision.recommended_reps, "9");
        assert_eq!(decision.recommended_weight, 50.0);
    }

    #[test]
    fn test_shortfall_holds() {
        let decision = run("Squat", &[(40.0, 5), (40.0, 4), (40.0, 6)], 8);

        assert_eq!(decision.action_type, ActionType::Maintain);
        assert_eq!(decision.recommended_reps, "8");
        assert_eq!(decision.recommended_weight, 40.0);
        assert_eq!(decision.confidence, 0.7);
    }

    #[test]
    fn test_incomplete_session_holds() {
        let mut session = latest("Leg Press", &[(100.0, 12), (100.0, 12)]);
        session.sets.push(WorkoutSet::new(100.0, 7, false));

        let decision = decide("Leg Press", &session, RepTarget::known(12), classify("Leg Press"));
        assert_eq!(decision.action_type, ActionType::Maintain);
        assert_eq!(decision.confidence, 0.7);
        assert_eq!(decision.reason, "not all sets completed (2 of 3)");
        assert_eq!(decision.recommended_weight, 100.0);
    }

    #[test]
    fn test_assumed_target_lowers_confidence() {
        let session = latest("Cable Fly", &[(20.0, 6), (20.0, 6)]);
        let decision = decide(
            "Cable Fly",
            &session,
            RepTarget::resolve(None),
            classify("Cable Fly"),
        );

        assert_eq!(decision.action_type, ActionType::IncreaseReps);
        assert_eq!(decision.recommended_reps, "8");
        assert_eq!(decision.confidence, 0.5);
        assert!(decision.reason.ends_with("no rep target on record, assumed 6"));
    }
}
