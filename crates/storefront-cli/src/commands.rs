//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// storefront-e2e: environment resolution and smoke checks for storefront UI tests
#[derive(Parser, Debug)]
#[command(name = "storefront-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved environment and base URL
    Env(EnvArgs),

    /// Print the effective run configuration
    Config(ConfigArgs),

    /// Open the home page in a browser and check the header renders
    Smoke(SmokeArgs),
}

/// Arguments for the env command
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Environment name (overrides TEST_ENV)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// List every configured environment instead
    #[arg(long, conflicts_with = "env")]
    pub all: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Environment name (overrides TEST_ENV)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the smoke command
#[derive(Parser, Debug)]
pub struct SmokeArgs {
    /// Environment name (overrides TEST_ENV)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Save a PNG of the home page here
    #[arg(long, value_name = "PATH")]
    pub screenshot: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
