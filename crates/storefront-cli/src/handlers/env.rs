//! Env command handler

use super::label;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::EnvArgs;
use serde::Serialize;
use std::fmt::Write as _;
use storefront_e2e::environment::{self, BASE_URL_VAR};
use storefront_e2e::{EnvProvider, Environment};

/// Resolved target of a run
#[derive(Debug, Serialize)]
pub struct EnvReport {
    /// Environment record picked by the resolver
    pub environment: &'static Environment,
    /// Base URL after the `BASE_URL` override
    pub base_url: String,
    /// Whether `BASE_URL` replaced the record's URL
    pub base_url_overridden: bool,
}

impl EnvReport {
    /// Resolve from `provider`, an explicit name beating `TEST_ENV`
    #[must_use]
    pub fn resolve(provider: &impl EnvProvider, name: Option<&str>) -> Self {
        let environment = environment::resolve_from_env(provider, name);
        let base_url =
            environment::resolve_base_url(provider.var(BASE_URL_VAR).as_deref(), environment);
        Self {
            environment,
            base_url_overridden: base_url != environment.base_url,
            base_url,
        }
    }

    /// Human-readable rendering
    #[must_use]
    pub fn render(&self, use_color: bool) -> String {
        let env = self.environment;
        let mut out = String::new();
        let _ = writeln!(out, "{}{} ({})", label("Environment", use_color), env.name, env.key);
        let suffix = if self.base_url_overridden {
            format!(" (from {BASE_URL_VAR})")
        } else {
            String::new()
        };
        let _ = writeln!(out, "{}{}{suffix}", label("Base URL", use_color), self.base_url);
        let _ = writeln!(
            out,
            "{}default {} ms, navigation {} ms, action {} ms",
            label("Timeouts", use_color),
            env.timeout.default,
            env.timeout.navigation,
            env.timeout.action
        );
        out
    }
}

/// Every configured environment as a text table
#[must_use]
pub fn render_all(use_color: bool) -> String {
    let mut out = String::new();
    for env in environment::environments() {
        let _ = writeln!(
            out,
            "{}{:<36} nav {:>6} ms  action {:>6} ms",
            label(env.key, use_color),
            env.base_url,
            env.timeout.navigation,
            env.timeout.action
        );
    }
    out
}

/// Execute the env command, returning what to print
pub fn execute_env(
    config: &CliConfig,
    args: &EnvArgs,
    provider: &impl EnvProvider,
) -> CliResult<String> {
    let use_color = config.use_color() && !args.json;
    if args.all {
        return Ok(if args.json {
            serde_json::to_string_pretty(environment::environments())?
        } else {
            render_all(use_color)
        });
    }

    let report = EnvReport::resolve(provider, args.env.as_deref());
    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(report.render(use_color))
    }
}
