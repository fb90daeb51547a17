//! CLI output formatting

use crate::core::{config::PlanConfig, error::ChainError};
use console::Emoji;
use serde_json::Value;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format the steps of a plan, one per line
pub fn format_plan_summary(config: &PlanConfig) -> String {
    config
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("  {}. {}", style(i + 1).dim(), style(step.kind()).cyan()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the terminal outcome of a chain
pub fn format_outcome(outcome: &Result<Value, ChainError>, elapsed: Duration) -> String {
    match outcome {
        Ok(value) => format!(
            "{} Finished in {}\n{}",
            CHECK,
            style(format_duration(elapsed)).dim(),
            format_output(&pretty(value), 20)
        ),
        Err(error) => format!(
            "{} Failed after {}: {}",
            CROSS,
            style(format_duration(elapsed)).dim(),
            style(error).red()
        ),
    }
}

/// Format a duration with millisecond precision
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Format output with truncation
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if lines.len() <= max_lines {
        output.to_string()
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{}... ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
