mod cli;
mod core;
mod execution;

use anyhow::{Context, Result};
use cli::commands::{RunCommand, ValidateCommand};
use cli::output::*;
use cli::{Cli, Command};
use serde_json::Value;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_plan(cmd).await?,
        Command::Validate(cmd) => validate_plan(cmd)?,
    }

    Ok(())
}

async fn run_plan(cmd: &RunCommand) -> Result<()> {
    let mut config = crate::core::config::PlanConfig::from_file(&cmd.file)
        .context("Failed to load plan")?;

    if let Some(seed) = &cmd.seed {
        config.seed = Some(seed.clone());
    }

    if !cmd.json {
        println!("{} Running plan: {}", ROCKET, style(&config.name).bold());
    }

    let (tx, rx) = oneshot::channel::<Result<Value, crate::core::error::ChainError>>();
    let start = Instant::now();
    config.to_chain().end(move |outcome| {
        let _ = tx.send(outcome);
    });
    let outcome = rx.await.context("Chain stopped without reporting an outcome")?;
    let elapsed = start.elapsed();

    if cmd.json {
        match &outcome {
            Ok(value) => println!("{}", serde_json::to_string_pretty(value)?),
            Err(e) => println!("{}", serde_json::json!({ "error": e.to_string() })),
        }
    } else {
        println!("{}", format_outcome(&outcome, elapsed));
    }

    if let Err(e) = outcome {
        error!("Plan {} failed: {}", config.name, e);
        std::process::exit(1);
    }

    Ok(())
}

fn validate_plan(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating plan...", INFO);

    match crate::core::config::PlanConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Plan is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Steps: {}", style(config.steps.len()).cyan());
            println!("{}", format_plan_summary(&config));

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
