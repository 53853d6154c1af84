pub mod decision;
pub mod history;
pub mod performance;

pub use decision::{ActionType, ProgressionDecision};
pub use history::{HistoryEntry, ProgressionRecord};
pub use performance::{ExercisePerformance, WorkoutSet};
