//! Writing decisions back onto a Hevy routine, and reading the routine's
//! current targets.

use std::collections::BTreeMap;

use crate::clients::models::common::{Exercise, ExerciseForUpdate};
use crate::clients::models::responses::RoutineResponse;
use crate::models::ProgressionDecision;
use crate::services::goals::{self, SetGoal};
use crate::services::progression::parse_target;

/// Current rep target per routine exercise: the goals note left by a previous
/// run, else the first working set's planned reps.
pub fn routine_targets(routine: &RoutineResponse) -> BTreeMap<String, String> {
    routine
        .exercises
        .iter()
        .filter_map(|exercise| exercise_target(exercise).map(|target| (exercise.title.clone(), target)))
        .collect()
}

fn exercise_target(exercise: &Exercise) -> Option<String> {
    if let Some(notes) = &exercise.notes
        && goals::is_goals_string(notes)
        && parse_target(notes).is_some()
    {
        return Some(notes.trim().to_string());
    }

    exercise
        .working_sets()
        .find_map(|set| set.reps)
        .filter(|&reps| reps > 0)
        .map(|reps| reps.to_string())
}

/// Routine exercises with each decision applied to their working sets and
/// recorded as a `GOALS:` note. Exercises without a decision are unchanged.
pub fn apply_decisions(
    routine: &RoutineResponse,
    decisions: &BTreeMap<String, ProgressionDecision>,
) -> Vec<ExerciseForUpdate> {
    routine
        .exercises
        .iter()
        .map(|exercise| {
            let mut update = exercise.to_update_format();
            if let Some(decision) = decisions.get(&exercise.title) {
                apply_decision(&mut update, decision);
            }
            update
        })
        .collect()
}

fn apply_decision(exercise: &mut ExerciseForUpdate, decision: &ProgressionDecision) {
    let set_goals = planned_goals(exercise, decision);
    if set_goals.is_empty() {
        return;
    }

    let mut working_number = 0u32;
    for set in exercise.sets.iter_mut().filter(|set| set.is_working()) {
        working_number += 1;
        if let Some(goal) = set_goals.iter().find(|goal| goal.set_number == working_number) {
            set.weight_kg = Some(goal.weight as f32);
            set.reps = Some(goal.reps);
        }
    }

    exercise.notes = Some(goals::encode_with_prefix(&set_goals));
}

/// Per-set goals for a decision: decoded directly for set-by-set decisions,
/// otherwise the single target spread over every working set.
fn planned_goals(exercise: &ExerciseForUpdate, decision: &ProgressionDecision) -> Vec<SetGoal> {
    if goals::is_goals_string(&decision.recommended_reps) {
        return goals::decode(&decision.recommended_reps).unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                exercise = %decision.exercise_name,
                "routine_update.goals_unreadable"
            );
            Vec::new()
        });
    }

    let Ok(reps) = decision.recommended_reps.trim().parse::<u32>() else {
        return Vec::new();
    };

    let working_sets = exercise.sets.iter().filter(|set| set.is_working()).count() as u32;
    (1..=working_sets)
        .map(|set_number| SetGoal {
            set_number,
            weight: decision.recommended_weight,
            reps,
        })
        .collect()
}
