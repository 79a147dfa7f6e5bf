//! storefront-e2e CLI library
//!
//! Command-line front end for the storefront end-to-end layer: inspect how
//! the target environment resolves and smoke-check a live storefront.

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, EnvArgs, SmokeArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
