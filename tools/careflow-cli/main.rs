use careflow::prelude::*;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Inspect and dry-run careflow workflow definitions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report dangling branch targets and incomplete steps
    Check {
        /// Path to the workflow JSON file
        workflow_path: String,
    },
    /// Print the workflow as a tree
    Show {
        /// Path to the workflow JSON file
        workflow_path: String,
    },
    /// Walk the workflow for a sample record
    Route {
        /// Path to the workflow JSON file
        workflow_path: String,
        /// Path to a JSON object of field path to value, e.g. {"patient.age": "42"}
        record_path: String,
        /// Stop after visiting this many steps
        #[arg(long, default_value_t = 100)]
        max_steps: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Check { workflow_path } => run_check(&workflow_path),
        Command::Show { workflow_path } => run_show(&workflow_path),
        Command::Route {
            workflow_path,
            record_path,
            max_steps,
        } => run_route(&workflow_path, &record_path, max_steps),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run_check(workflow_path: &str) -> Result<ExitCode> {
    let workflow = Workflow::from_file(workflow_path)?;
    tracing::info!("Checking workflow '{}'", workflow.name);

    let issues = workflow.reference_issues();
    let invalid = workflow.invalid_steps();

    for issue in &issues {
        println!("  -> {}", issue);
    }
    for index in &invalid {
        let step = &workflow.steps[*index];
        println!(
            "  -> Step {} ('{}', {}) is missing required fields",
            index + 1,
            step.id,
            step.step_type()
        );
    }

    if issues.is_empty() && invalid.is_empty() {
        println!("Workflow '{}' is consistent ({} steps)", workflow.name, workflow.len());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} reference issue(s), {} incomplete step(s)",
            issues.len(),
            invalid.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn run_show(workflow_path: &str) -> Result<ExitCode> {
    let workflow = Workflow::from_file(workflow_path)?;
    print!("{}", DisplayWorkflow { workflow: &workflow });
    Ok(ExitCode::SUCCESS)
}

fn run_route(workflow_path: &str, record_path: &str, max_steps: usize) -> Result<ExitCode> {
    let workflow = Workflow::from_file(workflow_path)?;
    let record_json = fs::read_to_string(record_path)
        .map_err(|e| format!("Failed to read record file '{}': {}", record_path, e))?;
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(&record_json)
        .map_err(|e| format!("Failed to parse record JSON: {}", e))?;

    // Non-string values are compared by their JSON text.
    let record: Record = raw
        .into_iter()
        .map(|(field, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (field, text)
        })
        .collect();

    let trace = workflow.trace(&record, max_steps)?;
    println!("Route through '{}':", workflow.name);
    for entry in &trace {
        match &entry.routing {
            Some(routing) => println!(
                "  -> {} (branch to {}: {})",
                entry.step, routing.target, routing.reason
            ),
            None => println!("  -> {}", entry.step),
        }
    }
    println!("  -> <end>");
    Ok(ExitCode::SUCCESS)
}
