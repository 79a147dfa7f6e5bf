//! Smoke command handler: open the home page and check the header renders

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::SmokeArgs;
use console::style;
use std::time::Instant;
use storefront_e2e::pages::HomePage;
use storefront_e2e::{EnvProvider, PageObject, RunConfig, Session};

/// What the smoke check saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    /// Environment key
    pub environment: String,
    /// URL after navigation
    pub url: String,
    /// Document title
    pub title: String,
    /// Featured product tiles on the home page
    pub featured_products: usize,
    /// Wall time of the check
    pub elapsed_ms: u128,
}

impl SmokeReport {
    /// One-line summary
    #[must_use]
    pub fn render(&self, use_color: bool) -> String {
        let status = if use_color {
            style("ok").green().bold().to_string()
        } else {
            "ok".to_string()
        };
        format!(
            "{status} [{}] {} loaded \"{}\" in {} ms ({} featured products)",
            self.environment, self.url, self.title, self.elapsed_ms, self.featured_products
        )
    }
}

/// Run configuration for a smoke check; `--headed` forces a visible window
#[must_use]
pub fn smoke_run_config(args: &SmokeArgs, provider: &impl EnvProvider) -> RunConfig {
    let run = RunConfig::from_env(provider, args.env.as_deref());
    if args.headed {
        run.with_headless(false)
    } else {
        run
    }
}

/// Execute the smoke command
pub async fn execute_smoke(
    config: &CliConfig,
    args: &SmokeArgs,
    provider: &impl EnvProvider,
) -> CliResult<String> {
    let run = smoke_run_config(args, provider);
    let environment = run.environment.key.to_string();
    let started = Instant::now();

    let session = Session::start(run).await?;
    let outcome = check_home(&session, args).await;
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }

    let (url, title, featured_products) = outcome?;
    let report = SmokeReport {
        environment,
        url,
        title,
        featured_products,
        elapsed_ms: started.elapsed().as_millis(),
    };
    tracing::info!(url = %report.url, elapsed_ms = report.elapsed_ms, "smoke check passed");
    Ok(report.render(config.use_color()))
}

async fn check_home(session: &Session, args: &SmokeArgs) -> CliResult<(String, String, usize)> {
    let home = HomePage::new(session.ui());
    home.navigate_to_home().await?;
    session
        .ui()
        .wait_for_element(&home.header().search_box, None)
        .await?;

    if !home.is_home_page_loaded().await? {
        return Err(CliError::smoke_failed("home page welcome block not visible"));
    }

    if let Some(ref path) = args.screenshot {
        session.screenshot(path).await?;
        tracing::info!(path = %path.display(), "screenshot saved");
    }

    Ok((
        session.ui().current_url().await?,
        session.ui().title().await?,
        home.featured_products_count().await?,
    ))
}
