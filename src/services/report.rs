use std::collections::BTreeMap;

use crate::models::{ActionType, ProgressionDecision};
use crate::services::goals::format_weight;
use crate::services::trend::TrendSummary;

pub fn render(client_name: &str, decisions: &BTreeMap<String, ProgressionDecision>) -> String {
    render_with_trends(client_name, decisions, &BTreeMap::new())
}

/// Plain-text summary, one block per exercise in name order, followed by a
/// count of each action.
pub fn render_with_trends(
    client_name: &str,
    decisions: &BTreeMap<String, ProgressionDecision>,
    trends: &BTreeMap<String, TrendSummary>,
) -> String {
    let title = format!("Progression report for {}", client_name);
    let mut output = format!("{}\n{}\n", title, "=".repeat(title.chars().count()));

    if decisions.is_empty() {
        output.push_str("\nNo exercises analysed.\n");
    }

    for (name, decision) in decisions {
        output.push_str(&format!("\n{}: {}\n", name, decision.action_type));
        output.push_str(&format!(
            "  weight: {}kg -> {}kg\n",
            format_weight(decision.current_weight),
            format_weight(decision.recommended_weight)
        ));
        output.push_str(&format!(
            "  reps: {} -> {}\n",
            display_reps(&decision.current_reps),
            display_reps(&decision.recommended_reps)
        ));
        output.push_str(&format!(
            "  confidence: {:.0}%\n",
            decision.confidence * 100.0
        ));
        output.push_str(&format!("  reason: {}\n", decision.reason));

        if let Some(trend) = trends.get(name) {
            output.push_str(&format_trend(trend));
        }
    }

    let counts = ActionType::ALL
        .iter()
        .map(|action| {
            let count = decisions
                .values()
                .filter(|decision| decision.action_type == *action)
                .count();
            format!("{} {}", action, count)
        })
        .collect::<Vec<_>>()
        .join(", ");
    output.push_str(&format!("\nSummary: {}\n", counts));

    output
}

fn display_reps(reps: &str) -> &str {
    if reps.is_empty() { "-" } else { reps }
}

fn format_trend(trend: &TrendSummary) -> String {
    format!(
        "  trend: volume {:+.1}kg/session, completion {:.0}%, intensity {:+.1}% over {} sessions\n",
        trend.volume_trend,
        trend.completion_rate * 100.0,
        trend.intensity_trend * 100.0,
        trend.sessions
    )
}
