use apigen_loader::{DiscoverResult, discover_spec};
use clap::Args;
use console::style;

use crate::commands::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    #[arg(
        value_name = "BASE_URL",
        help = "Base URL of a running service, e.g. http://localhost:8080"
    )]
    pub base_url: String,
}

pub async fn run(args: DiscoverArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: DiscoverArgs) -> Result<(), String> {
    let found = discover(&args.base_url).await?;
    println!(
        "Found {} spec at {}",
        style(found.version).bold(),
        style(&found.url).cyan()
    );
    println!("Generate with: apigen generate -i {}", found.url);
    Ok(())
}

pub(crate) async fn discover(base_url: &str) -> Result<DiscoverResult, String> {
    println!("Looking for an API spec under {}", style(base_url).cyan());
    discover_spec(base_url).await.map_err(|err| err.to_string())
}
