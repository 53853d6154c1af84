//! Wire codec for multi-set goals: `"S1: 60kg*8 | S2: 62.5kg*6"`.
//!
//! The routine-application side stores this text in a free-form notes field,
//! optionally behind a `"GOALS: "` prefix which decoding strips.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{EngineError, EngineResult};

pub const GOALS_PREFIX: &str = "GOALS: ";
const SEPARATOR: &str = " | ";

static SET_GOAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^S(\d+):\s*(\d+(?:\.\d+)?)\s*kg\s*\*\s*(\d+)$").expect("set goal regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetGoal {
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
}

impl std::fmt::Display for SetGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "S{}: {}kg*{}",
            self.set_number,
            format_weight(self.weight),
            self.reps
        )
    }
}

pub fn encode(goals: &[SetGoal]) -> String {
    goals
        .iter()
        .map(SetGoal::to_string)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

pub fn encode_with_prefix(goals: &[SetGoal]) -> String {
    format!("{}{}", GOALS_PREFIX, encode(goals))
}

pub fn decode(text: &str) -> EngineResult<Vec<SetGoal>> {
    let body = strip_prefix(text.trim());
    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split('|')
        .map(|segment| parse_segment(segment.trim()))
        .collect()
}

/// True when `text` looks like a goals string rather than a bare rep count.
pub fn is_goals_string(text: &str) -> bool {
    let body = strip_prefix(text.trim());
    body.split('|')
        .next()
        .is_some_and(|segment| SET_GOAL_REGEX.is_match(segment.trim()))
}

fn strip_prefix(text: &str) -> &str {
    let marker = GOALS_PREFIX.trim_end();
    match text.get(..marker.len()) {
        Some(head) if head.eq_ignore_ascii_case(marker) => text[marker.len()..].trim_start(),
        _ => text,
    }
}

fn parse_segment(segment: &str) -> EngineResult<SetGoal> {
    let captures = SET_GOAL_REGEX
        .captures(segment)
        .ok_or_else(|| EngineError::MalformedRecord(format!("invalid set goal '{}'", segment)))?;

    let field = |index: usize| captures.get(index).map(|m| m.as_str()).unwrap_or_default();
    let malformed = |_| EngineError::MalformedRecord(format!("invalid set goal '{}'", segment));

    Ok(SetGoal {
        set_number: field(1).parse().map_err(malformed)?,
        weight: field(2).parse().map_err(|_| {
            EngineError::MalformedRecord(format!("invalid weight in '{}'", segment))
        })?,
        reps: field(3).parse().map_err(malformed)?,
    })
}

/// `60` for whole kilos, otherwise up to four decimals (`62.5`, `22.6796`)
/// so converted pound plates survive a round trip.
pub fn format_weight(weight: f64) -> String {
    if weight.fract().abs() < f64::EPSILON {
        format!("{:.0}", weight)
    } else {
        format!("{:.4}", weight)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
