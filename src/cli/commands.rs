//! CLI command definitions

use clap::Args;
use serde_json::Value;

/// Run a plan
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to plan YAML file
    #[arg(short, long)]
    pub file: String,

    /// Seed override, as JSON
    #[arg(long, value_parser = parse_json)]
    pub seed: Option<Value>,

    /// Print the result as JSON only
    #[arg(long)]
    pub json: bool,
}

/// Validate a plan file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to plan YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse a JSON argument
fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {}", e))
}
