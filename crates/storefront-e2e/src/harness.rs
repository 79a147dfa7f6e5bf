//! Per-test browser session used by the live suites.
//!
//! A [`Session`] owns one launched browser and one isolated browser context,
//! wired into an [`Interactions`] built from the resolved [`RunConfig`].

use crate::browser::{Browser, BrowserConfig};
use crate::config::RunConfig;
use crate::environment::SystemEnv;
use crate::interaction::Interactions;
use crate::result::{E2eError, E2eResult};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call from every test; only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
}

/// Run `fut`, failing with [`E2eError::Timeout`] once `budget` elapses
pub async fn bounded<T, F>(budget: Duration, what: &str, fut: F) -> E2eResult<T>
where
    F: Future<Output = E2eResult<T>>,
{
    tokio::time::timeout(budget, fut).await.unwrap_or_else(|_| {
        Err(E2eError::timeout(
            u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
            what,
        ))
    })
}

/// One browser plus one fresh context for a single test
#[derive(Debug)]
pub struct Session {
    config: RunConfig,
    browser: Browser,
    ui: Interactions,
}

impl Session {
    /// Launch a browser for `config` and open a context on it
    pub async fn start(config: RunConfig) -> E2eResult<Self> {
        let browser = Browser::launch(BrowserConfig::from_run_config(&config)).await?;
        let driver = browser.new_context().await?;
        let ui = Interactions::from_config(driver, &config);
        tracing::info!(
            environment = config.environment.key,
            base_url = %config.base_url,
            "session started"
        );
        Ok(Self {
            config,
            browser,
            ui,
        })
    }

    /// [`Session::start`] with configuration read from the process environment
    pub async fn from_env() -> E2eResult<Self> {
        Self::start(RunConfig::from_env(&SystemEnv, None)).await
    }

    /// Interaction layer over this session's context
    #[must_use]
    pub const fn ui(&self) -> &Interactions {
        &self.ui
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run a test body under the configured per-test timeout
    pub async fn run<T, F>(&self, name: &str, body: F) -> E2eResult<T>
    where
        F: Future<Output = E2eResult<T>>,
    {
        let result = bounded(self.config.test_timeout(), name, body).await;
        if let Err(ref e) = result {
            tracing::warn!(test = name, error = %e, "test body failed");
        }
        result
    }

    /// Save a PNG of the current viewport
    pub async fn screenshot(&self, path: impl AsRef<Path>) -> E2eResult<()> {
        let shot = self.ui.driver().screenshot().await?;
        shot.save(path)
    }

    /// Close the context, then the browser
    pub async fn close(self) -> E2eResult<()> {
        let closed = self.ui.driver().close().await;
        self.browser.close().await?;
        closed
    }
}
