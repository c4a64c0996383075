use apigen_ir::{Document, Ir, extract};
use apigen_loader::{is_url, load_spec};
use clap::Args;
use console::style;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::commands::run_cli_async;
use crate::common::format_elapsed_ms;
use crate::config::{ConfigInput, load_config, resolve_config};
use crate::writer::write_ir;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH_OR_URL",
        help = "Path or http(s) URL of the OpenAPI/Swagger document"
    )]
    pub input: Option<String>,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory [default: ./src/api/generated]"
    )]
    pub output: Option<PathBuf>,
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Config file. Defaults to apigen.toml in the working directory, if present"
    )]
    pub config: Option<PathBuf>,
    #[arg(long = "compact", help = "Write the IR as single-line JSON")]
    pub compact: bool,
}

pub async fn run(args: GenerateArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let cwd = std::env::current_dir()
        .map_err(|err| format!("Failed to read working directory: {err}"))?;
    generate(args, &cwd).await.map(|_| ())
}

/// Resolve settings relative to `dir`, then load, extract and write.
pub(crate) async fn generate(args: GenerateArgs, dir: &Path) -> Result<Ir, String> {
    let start = Instant::now();
    let file_settings = load_config(args.config.as_deref(), dir)?;
    let flags = ConfigInput {
        input: args.input,
        output: args.output,
        pretty: args.compact.then_some(false),
    };
    let config = resolve_config(file_settings.merge(flags))?;
    debug!(?config, "Resolved configuration.");

    let input = if is_url(&config.input) || Path::new(&config.input).is_absolute() {
        config.input.clone()
    } else {
        dir.join(&config.input).to_string_lossy().into_owned()
    };
    let output = if config.output.is_absolute() {
        config.output.clone()
    } else {
        dir.join(&config.output)
    };

    println!("Reading spec from {}", style(&input).cyan());
    let value = load_spec(&input).await.map_err(|err| err.to_string())?;
    let document = Document::from_value(&value).map_err(|err| err.to_string())?;
    let ir = extract(&document);

    println!(
        "Found {} operations, {} schemas",
        style(ir.operations.len()).bold(),
        style(ir.schemas.len()).bold()
    );

    let path = write_ir(&ir, &output, config.pretty)?;
    info!(path = %path.display(), "Generation finished.");
    println!(
        "{} IR written to {} in {}",
        style("✓").green(),
        style(path.display()).dim(),
        format_elapsed_ms(start)
    );
    Ok(ir)
}
