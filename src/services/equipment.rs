use serde::{Deserialize, Serialize};

const DUMBBELL_WEIGHTS: [f64; 26] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.5, 8.0, 9.0, 10.0, 12.5, 15.0, 17.5, 20.0, 22.5, 25.0, 27.5,
    30.0, 32.5, 35.0, 37.5, 40.0, 42.5, 45.0, 47.5, 50.0,
];

const PLATE_INCREMENT: f64 = 2.5;

const DUMBBELL_KEYWORDS: [&str; 3] = ["dumbbell", "db", "alternating"];
const BARBELL_KEYWORDS: [&str; 5] = ["barbell", "bb", "bench press", "squat", "deadlift"];
const MACHINE_KEYWORDS: [&str; 5] = ["machine", "cable", "lat pull", "seated", "leg press"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentClass {
    Dumbbell,
    Barbell,
    Machine,
}

impl std::fmt::Display for EquipmentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dumbbell => write!(f, "dumbbell"),
            Self::Barbell => write!(f, "barbell"),
            Self::Machine => write!(f, "machine"),
        }
    }
}

/// Keyword classification, checked dumbbell, then barbell, then machine.
/// Names matching nothing are treated as barbell lifts.
pub fn classify(exercise_name: &str) -> EquipmentClass {
    let name = exercise_name.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|keyword| name.contains(keyword));

    if has_any(&DUMBBELL_KEYWORDS[..]) {
        EquipmentClass::Dumbbell
    } else if has_any(&BARBELL_KEYWORDS[..]) {
        EquipmentClass::Barbell
    } else if has_any(&MACHINE_KEYWORDS[..]) {
        EquipmentClass::Machine
    } else {
        EquipmentClass::Barbell
    }
}

/// Next loadable weight above `current_weight` for the equipment class.
pub fn next_weight(current_weight: f64, equipment: EquipmentClass) -> f64 {
    match equipment {
        EquipmentClass::Dumbbell => DUMBBELL_WEIGHTS
            .iter()
            .copied()
            .find(|&weight| weight > current_weight)
            .unwrap_or(current_weight + PLATE_INCREMENT),
        EquipmentClass::Barbell | EquipmentClass::Machine => current_weight + PLATE_INCREMENT,
    }
}
