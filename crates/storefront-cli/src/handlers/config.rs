//! Config command handler

use super::label;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::ConfigArgs;
use std::fmt::Write as _;
use storefront_e2e::{EnvProvider, RunConfig};

/// Print the effective run configuration
#[must_use]
pub fn render_run_config(run: &RunConfig, use_color: bool) -> String {
    let mut out = String::new();
    let mut line = |name: &str, value: String| {
        let _ = writeln!(out, "{}{value}", label(name, use_color));
    };
    line(
        "Environment",
        format!("{} ({})", run.environment.name, run.environment.key),
    );
    line("Base URL", run.base_url.clone());
    line("CI", run.ci.to_string());
    line("Headless", run.headless.to_string());
    line(
        "Viewport",
        format!("{}x{}", run.viewport_width, run.viewport_height),
    );
    line("Action", format!("{} ms", run.action_timeout_ms));
    line("Navigation", format!("{} ms", run.navigation_timeout_ms));
    line("Expect", format!("{} ms", run.expect_timeout_ms));
    line("Test", format!("{} ms", run.test_timeout_ms));
    line("Retries", run.retries.to_string());
    line(
        "Workers",
        run.workers.map_or_else(|| "auto".to_string(), |w| w.to_string()),
    );
    line(
        "Chromium",
        run.chromium_path
            .clone()
            .unwrap_or_else(|| "auto-detect".to_string()),
    );
    line("Sandbox", run.sandbox.to_string());
    out
}

/// Execute the config command, returning what to print
pub fn execute_config(
    config: &CliConfig,
    args: &ConfigArgs,
    provider: &impl EnvProvider,
) -> CliResult<String> {
    let run = RunConfig::from_env(provider, args.env.as_deref());
    if args.json {
        Ok(serde_json::to_string_pretty(&run)?)
    } else {
        Ok(render_run_config(&run, config.use_color()))
    }
}
