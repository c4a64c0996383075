//! Command-line interface for apigen.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;
mod common;
pub mod config;
pub mod writer;

/// Crates whose log output `APIGEN_LOG=<level>` controls.
const LOG_TARGETS: [&str; 3] = ["apigen_cli", "apigen_loader", "apigen_ir"];
const LOG_ENV_VAR: &str = "APIGEN_LOG";

#[derive(Parser)]
#[command(
    name = "apigen",
    version,
    about = "Extract a flat, generator-ready IR from OpenAPI 3.x and Swagger 2.0 documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a document, extract the IR and write it to <output>/ir.json
    Generate(commands::generate::GenerateArgs),
    /// Find a document served at a well-known path under a base URL
    Discover(commands::discover::DiscoverArgs),
}

/// Run the CLI with `args` (including the program name) and return the exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing();
            match cli.command {
                Some(Commands::Generate(args)) => commands::generate::run(args).await,
                Some(Commands::Discover(args)) => commands::discover::run(args).await,
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // APIGEN_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "apigen_loader=debug,reqwest=warn"
    let filter = log_filter(std::env::var(LOG_ENV_VAR).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn log_filter(env_value: Option<&str>) -> String {
    match env_value {
        Some(level) if is_plain_level(level) => per_target(level),
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => per_target("info"),
    }
}

fn per_target(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
