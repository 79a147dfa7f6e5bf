//! Run configuration: the effective settings of one test process.
//!
//! Derived once from the resolved [`Environment`] plus process variables, then
//! handed to the browser launcher and to [`crate::Interactions::from_config`].

use crate::environment::{resolve_base_url, resolve_from_env, EnvProvider, Environment, BASE_URL_VAR};
use crate::interaction::DEFAULT_EXPECT_TIMEOUT_MS;
use serde::Serialize;
use std::time::Duration;

/// Variable marking a CI run
pub const CI_VAR: &str = "CI";

/// Variable turning headless mode off (`false` or `0`)
pub const HEADLESS_VAR: &str = "HEADLESS";

/// Variable pointing at a Chromium executable
pub const CHROMIUM_PATH_VAR: &str = "CHROMIUM_PATH";

/// Whole-test budget (100 seconds)
pub const DEFAULT_TEST_TIMEOUT_MS: u64 = 100_000;

/// Retries on CI
pub const CI_RETRIES: u32 = 2;

/// Parallel workers on CI
pub const CI_WORKERS: usize = 4;

/// Viewport width
pub const VIEWPORT_WIDTH: u32 = 1920;

/// Viewport height
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Effective run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    /// Resolved environment record
    pub environment: &'static Environment,
    /// Base URL pages are loaded from
    pub base_url: String,
    /// Whether this is a CI run
    pub ci: bool,
    /// Run the browser without a window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Action budget in milliseconds
    pub action_timeout_ms: u64,
    /// Navigation budget in milliseconds
    pub navigation_timeout_ms: u64,
    /// Assertion budget in milliseconds
    pub expect_timeout_ms: u64,
    /// Whole-test budget in milliseconds
    pub test_timeout_ms: u64,
    /// Retries per failing test
    pub retries: u32,
    /// Parallel workers (`None` lets the runner decide)
    pub workers: Option<usize>,
    /// Chromium executable (`None` = auto-detect)
    pub chromium_path: Option<String>,
    /// Chromium sandbox (disabled on CI containers)
    pub sandbox: bool,
}

impl RunConfig {
    /// Resolve from process variables; `env_override` beats `TEST_ENV`
    #[must_use]
    pub fn from_env(provider: &impl EnvProvider, env_override: Option<&str>) -> Self {
        let environment = resolve_from_env(provider, env_override);
        let base_url = resolve_base_url(provider.var(BASE_URL_VAR).as_deref(), environment);
        let ci = provider.var(CI_VAR).is_some_and(|v| !v.is_empty());
        let headless = provider
            .var(HEADLESS_VAR)
            .map_or(true, |v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0"));
        let chromium_path = provider.var(CHROMIUM_PATH_VAR).filter(|p| !p.is_empty());

        tracing::debug!(
            environment = environment.key,
            %base_url,
            ci,
            headless,
            "run configuration resolved"
        );

        Self {
            environment,
            base_url,
            ci,
            headless,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            action_timeout_ms: environment.timeout.action,
            navigation_timeout_ms: environment.timeout.navigation,
            expect_timeout_ms: DEFAULT_EXPECT_TIMEOUT_MS,
            test_timeout_ms: DEFAULT_TEST_TIMEOUT_MS,
            retries: if ci { CI_RETRIES } else { 0 },
            workers: ci.then_some(CI_WORKERS),
            chromium_path,
            sandbox: !ci,
        }
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Action budget
    #[must_use]
    pub const fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    /// Navigation budget
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Assertion budget
    #[must_use]
    pub const fn expect_timeout(&self) -> Duration {
        Duration::from_millis(self.expect_timeout_ms)
    }

    /// Whole-test budget
    #[must_use]
    pub const fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }
}
