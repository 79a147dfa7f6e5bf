//! storefront-e2e: inspect environment resolution and smoke-check a storefront
//!
//! ## Usage
//!
//! ```bash
//! storefront-e2e env                      # Resolved environment and base URL
//! storefront-e2e env --env staging --json # Same, as JSON
//! storefront-e2e config                   # Effective run configuration
//! storefront-e2e smoke --headed           # Open the home page in Chromium
//! ```

use clap::Parser;
use std::process::ExitCode;
use storefront_cli::handlers::{config::execute_config, env::execute_env, smoke::execute_smoke};
use storefront_cli::{logging, Cli, CliConfig, CliResult, Commands, Verbosity};
use storefront_e2e::SystemEnv;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(config.verbosity, config.use_color());

    let output = match cli.command {
        Commands::Env(args) => execute_env(&config, &args, &SystemEnv)?,
        Commands::Config(args) => execute_config(&config, &args, &SystemEnv)?,
        Commands::Smoke(args) => execute_smoke(&config, &args, &SystemEnv).await?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.clone().into())
}
