use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    IncreaseWeight,
    IncreaseReps,
    Maintain,
    DecreaseWeight,
}

impl ActionType {
    pub const ALL: [ActionType; 4] = [
        ActionType::IncreaseWeight,
        ActionType::IncreaseReps,
        ActionType::Maintain,
        ActionType::DecreaseWeight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IncreaseWeight => "increase_weight",
            Self::IncreaseReps => "increase_reps",
            Self::Maintain => "maintain",
            Self::DecreaseWeight => "decrease_weight",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown action type: {}", s))
    }
}

/// Next training prescription for one exercise.
///
/// `recommended_reps` is either a bare integer or a multi-set goals string
/// (see `services::goals`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionDecision {
    pub exercise_name: String,
    pub current_weight: f64,
    pub recommended_weight: f64,
    pub current_reps: String,
    pub recommended_reps: String,
    pub reason: String,
    pub confidence: f64,
    pub action_type: ActionType,
}

impl ProgressionDecision {
    /// Neutral decision used when there is nothing to base a change on.
    pub fn hold(exercise_name: &str, weight: f64, reps: String, reason: String) -> Self {
        Self {
            exercise_name: exercise_name.to_string(),
            current_weight: weight,
            recommended_weight: weight,
            current_reps: reps.clone(),
            recommended_reps: reps,
            reason,
            confidence: 0.5,
            action_type: ActionType::Maintain,
        }
    }
}
