//! Progression strategies.
//!
//! Callers pick a strategy explicitly: `WholeExercise` when a rep target is
//! on record, `RepBased` for cold-start clients without one, and `SetBySet`
//! when each working set should progress at its own pace.

pub mod rep_based;
pub mod set_by_set;
pub mod whole_exercise;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{ActionType, ExercisePerformance, ProgressionDecision};
use crate::services::equipment::{self, EquipmentClass};
use crate::services::goals;
use crate::services::ladder::{self, LADDER_CEILING, LADDER_FLOOR};

pub const DEFAULT_TARGET_REPS: u32 = LADDER_FLOOR;

const CEILING_CONFIDENCE: f64 = 0.95;
const PROGRESS_CONFIDENCE: f64 = 0.9;
const HOLD_CONFIDENCE: f64 = 0.7;
/// Upper bound on confidence when the rep target had to be assumed.
const ASSUMED_TARGET_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionStrategy {
    WholeExercise,
    #[default]
    SetBySet,
    RepBased,
}

impl std::fmt::Display for ProgressionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WholeExercise => write!(f, "whole_exercise"),
            Self::SetBySet => write!(f, "set_by_set"),
            Self::RepBased => write!(f, "rep_based"),
        }
    }
}

impl std::str::FromStr for ProgressionStrategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whole_exercise" => Ok(Self::WholeExercise),
            "set_by_set" => Ok(Self::SetBySet),
            "rep_based" => Ok(Self::RepBased),
            _ => Err(format!("Unknown progression strategy: {}", s)),
        }
    }
}

impl ProgressionStrategy {
    /// Decide the next prescription from an exercise's history, sorted
    /// ascending by date. Only the latest session drives the decision.
    pub fn decide(
        self,
        exercise_name: &str,
        history: &[ExercisePerformance],
        last_target: Option<&str>,
    ) -> EngineResult<ProgressionDecision> {
        let latest = history.last().ok_or_else(|| {
            EngineError::InsufficientData(format!("no sessions recorded for {}", exercise_name))
        })?;

        if latest.sets.is_empty() {
            return Err(EngineError::InsufficientData(format!(
                "latest session of {} has no sets",
                exercise_name
            )));
        }

        let equipment = equipment::classify(exercise_name);

        match self {
            Self::WholeExercise => {
                let target = RepTarget::resolve(last_target);
                Ok(whole_exercise::decide(exercise_name, latest, target, equipment))
            }
            Self::SetBySet => Ok(set_by_set::decide(exercise_name, latest, equipment)),
            Self::RepBased => {
                let target = last_target.and_then(parse_target);
                Ok(rep_based::decide(exercise_name, latest, target))
            }
        }
    }
}

/// Rep target carried into a whole-exercise decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepTarget {
    pub reps: u32,
    pub assumed: bool,
}

impl RepTarget {
    pub fn known(reps: u32) -> Self {
        Self {
            reps,
            assumed: false,
        }
    }

    pub fn resolve(last_target: Option<&str>) -> Self {
        match last_target.and_then(parse_target) {
            Some(reps) => Self::known(reps),
            None => Self {
                reps: DEFAULT_TARGET_REPS,
                assumed: true,
            },
        }
    }
}

/// Reads a rep target from a bare count (`"10"`) or from the first set of a
/// goals string.
pub fn parse_target(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if let Ok(reps) = trimmed.parse::<u32>() {
        return (reps > 0).then_some(reps);
    }

    goals::decode(trimmed)
        .ok()
        .and_then(|goals| goals.first().map(|goal| goal.reps))
        .filter(|&reps| reps > 0)
}

/// Outcome of one ladder evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderStep {
    pub weight: f64,
    pub reps: u32,
    pub action: ActionType,
    pub confidence: f64,
    pub reason: String,
}

/// Evaluate the rep ladder for `achieved` reps against `target` at `weight`.
///
/// Reaching the top of the ladder (a target of 15, or 14+ reps achieved)
/// moves the weight up and resets reps to the floor. Otherwise a full hit
/// climbs to the next rung, a one-rep miss climbs by one, and anything
/// shorter holds.
pub fn ladder_step(
    target: u32,
    achieved: u32,
    weight: f64,
    equipment: EquipmentClass,
) -> LadderStep {
    let within_one = achieved.saturating_add(1) >= target;
    let at_ceiling = achieved.saturating_add(1) >= LADDER_CEILING;

    if within_one && (target >= LADDER_CEILING || at_ceiling) {
        let next = equipment::next_weight(weight, equipment);
        return LadderStep {
            weight: next,
            reps: LADDER_FLOOR,
            action: ActionType::IncreaseWeight,
            confidence: CEILING_CONFIDENCE,
            reason: format!(
                "{} reps reaches the {}-rep ceiling; {} weight up to {}kg, reps reset to {}",
                achieved,
                LADDER_CEILING,
                equipment,
                goals::format_weight(next),
                LADDER_FLOOR
            ),
        };
    }

    if within_one {
        let (reps, reason) = if achieved >= target {
            let next = ladder::next_rung(target);
            (next, format!("hit {} of {} target reps; up to {} reps", achieved, target, next))
        } else {
            let next = ladder::near_miss_step(target);
            (
                next,
                format!("{} reps, one short of {}; up to {} reps", achieved, target, next),
            )
        };
        return LadderStep {
            weight,
            reps,
            action: ActionType::IncreaseReps,
            confidence: PROGRESS_CONFIDENCE,
            reason,
        };
    }

    LadderStep {
        weight,
        reps: target,
        action: ActionType::Maintain,
        confidence: HOLD_CONFIDENCE,
        reason: format!(
            "{} reps is more than one short of {}; holding {}kg for {} reps",
            achieved,
            target,
            goals::format_weight(weight),
            target
        ),
    }
}
