//! Safe interactions: the primitives every page object acts through.
//!
//! Each action first waits for the element to be actionable (visible, bounded by
//! a budget) and only then touches it, so asynchronous rendering never turns into
//! a click on nothing. [`Interactions`] is a cheap clone: it shares one driver
//! (one browsing context) and carries the base URL and timeout budget the run
//! was resolved with.

use crate::config::RunConfig;
use crate::driver::{ClickOptions, CookieInfo, Driver};
use crate::environment::Environment;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use crate::wait::{
    wait_for_state, TwoPhaseOutcome, TwoPhaseWait, WaitOptions, WaitResult, WaitState,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_SAFE_TIMEOUT_MS,
};
use std::sync::Arc;
use std::time::Duration;

/// Busy overlay the storefront shows while a listing refreshes in place
pub const AJAX_BUSY_SELECTOR: &str = ".ajax-products-busy";

/// Budget for auto-retrying assertions (10 seconds)
pub const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 10_000;

/// Timeout budget of the interaction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionTimeouts {
    /// Visibility budget of safe clicks, selects and `wait_for_element`
    pub safe: Duration,
    /// Budget of the other actions and of un-timed waits
    pub action: Duration,
    /// Page load budget
    pub navigation: Duration,
    /// Assertion retry budget
    pub expect: Duration,
    /// Polling interval of every wait
    pub poll_interval: Duration,
    /// Busy-indicator wait
    pub ajax: TwoPhaseWait,
}

impl InteractionTimeouts {
    /// Budgets derived from an environment record
    #[must_use]
    pub const fn for_environment(environment: &Environment) -> Self {
        Self {
            safe: Duration::from_millis(DEFAULT_SAFE_TIMEOUT_MS),
            action: environment.timeout.action_duration(),
            navigation: environment.timeout.navigation_duration(),
            expect: Duration::from_millis(DEFAULT_EXPECT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            ajax: TwoPhaseWait::ajax(),
        }
    }

    fn wait_options(&self, timeout: Duration) -> WaitOptions {
        WaitOptions::within(timeout).with_poll_interval(self.poll_interval.as_millis() as u64)
    }
}

impl Default for InteractionTimeouts {
    fn default() -> Self {
        Self::for_environment(crate::environment::default_environment())
    }
}

/// Shared interaction helper held by every page object
#[derive(Debug, Clone)]
pub struct Interactions {
    driver: Arc<dyn Driver>,
    base_url: Arc<str>,
    timeouts: InteractionTimeouts,
}

impl Interactions {
    /// Create a helper over `driver`
    #[must_use]
    pub fn new(
        driver: Arc<dyn Driver>,
        base_url: impl Into<String>,
        timeouts: InteractionTimeouts,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            driver,
            base_url: Arc::from(base_url),
            timeouts,
        }
    }

    /// Create a helper from a resolved run configuration
    #[must_use]
    pub fn from_config(driver: Arc<dyn Driver>, config: &RunConfig) -> Self {
        let timeouts = InteractionTimeouts {
            action: config.action_timeout(),
            navigation: config.navigation_timeout(),
            expect: config.expect_timeout(),
            ..InteractionTimeouts::for_environment(config.environment)
        };
        Self::new(driver, config.base_url.clone(), timeouts)
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Base URL relative paths are joined to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout budget
    #[must_use]
    pub const fn timeouts(&self) -> &InteractionTimeouts {
        &self.timeouts
    }

    /// Resolve a path against the base URL; absolute URLs pass through
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Load `path` (relative to the base URL), bounded by the navigation budget
    pub async fn navigate(&self, path: &str) -> E2eResult<()> {
        let url = self.url_for(path);
        tracing::info!(%url, "navigate");
        let budget = self.timeouts.navigation;
        match tokio::time::timeout(budget, self.driver.goto(&url)).await {
            Ok(result) => result,
            Err(_) => Err(E2eError::timeout(
                budget.as_millis() as u64,
                format!("navigation to {url}"),
            )),
        }
    }

    /// Current document URL
    pub async fn current_url(&self) -> E2eResult<String> {
        self.driver.current_url().await
    }

    /// Current document title
    pub async fn title(&self) -> E2eResult<String> {
        self.driver.title().await
    }

    // =========================================================================
    // Waits
    // =========================================================================

    /// Wait for `locator` to reach `state` (action budget when `timeout` is `None`)
    pub async fn wait_for(
        &self,
        locator: &Locator,
        state: WaitState,
        timeout: Option<Duration>,
    ) -> E2eResult<WaitResult> {
        let options = self
            .timeouts
            .wait_options(timeout.unwrap_or(self.timeouts.action));
        wait_for_state(self.driver.as_ref(), locator, state, &options).await
    }

    /// Wait for visible, then for attached; each stage gets the full budget
    pub async fn wait_for_element(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> E2eResult<()> {
        let budget = timeout.unwrap_or(self.timeouts.safe);
        tracing::debug!(%locator, "wait for element");
        self.wait_for(locator, WaitState::Visible, Some(budget)).await?;
        self.wait_for(locator, WaitState::Attached, Some(budget)).await?;
        Ok(())
    }

    /// Let an in-place listing refresh finish.
    ///
    /// The busy indicator may never show up for fast responses; only an
    /// indicator that stays up past the settle budget is an error.
    pub async fn wait_for_ajax_complete(&self) -> E2eResult<TwoPhaseOutcome> {
        let busy = Locator::new(AJAX_BUSY_SELECTOR);
        let outcome = self
            .timeouts
            .ajax
            .with_poll_interval(self.timeouts.poll_interval)
            .run(self.driver.as_ref(), &busy)
            .await?;
        tracing::debug!(
            appeared = outcome.tolerant_met,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "ajax settled"
        );
        Ok(outcome)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Wait until visible, scroll into view, click.
    ///
    /// `options.timeout` bounds the visibility wait (10 s when unset) and is not
    /// forwarded. When the element never shows up no click is attempted.
    pub async fn safe_click(&self, locator: &Locator, options: &ClickOptions) -> E2eResult<()> {
        let budget = options.timeout.unwrap_or(self.timeouts.safe);
        tracing::debug!(%locator, budget_ms = budget.as_millis() as u64, "safe click");
        self.wait_for(locator, WaitState::Visible, Some(budget)).await?;
        self.driver.scroll_into_view(locator).await?;
        self.driver.click(locator, &options.without_timeout()).await
    }

    /// Click with default options through [`Self::safe_click`]
    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.safe_click(locator, &ClickOptions::default()).await
    }

    /// Click with options through [`Self::safe_click`]
    pub async fn click_with(&self, locator: &Locator, options: &ClickOptions) -> E2eResult<()> {
        self.safe_click(locator, options).await
    }

    /// Wait until visible, select the option labelled `label`, press Enter to commit
    pub async fn safe_select_option(
        &self,
        locator: &Locator,
        label: &str,
        timeout: Option<Duration>,
    ) -> E2eResult<()> {
        tracing::debug!(%locator, label, "safe select");
        self.wait_for(
            locator,
            WaitState::Visible,
            Some(timeout.unwrap_or(self.timeouts.safe)),
        )
        .await?;
        self.driver.select_option(locator, label).await?;
        self.driver.press_key("Enter").await
    }

    /// Select an option without committing with Enter
    pub async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()> {
        tracing::debug!(%locator, label, "select");
        self.wait_for(locator, WaitState::Visible, None).await?;
        self.driver.select_option(locator, label).await
    }

    /// Replace the value of an input
    pub async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        tracing::debug!(%locator, "fill");
        self.wait_for(locator, WaitState::Visible, None).await?;
        self.driver.fill(locator, value).await
    }

    /// Tick a checkbox or radio
    pub async fn check(&self, locator: &Locator) -> E2eResult<()> {
        self.set_checked(locator, true).await
    }

    /// Untick a checkbox
    pub async fn uncheck(&self, locator: &Locator) -> E2eResult<()> {
        self.set_checked(locator, false).await
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> E2eResult<()> {
        tracing::debug!(%locator, checked, "set checked");
        self.wait_for(locator, WaitState::Visible, None).await?;
        self.driver.set_checked(locator, checked).await
    }

    /// Press a key on the focused element
    pub async fn press(&self, key: &str) -> E2eResult<()> {
        self.driver.press_key(key).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Whether the locator is visible right now (no waiting)
    pub async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        Ok(self.driver.element_state(locator).await?.visible)
    }

    /// Number of current matches (no waiting)
    pub async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        Ok(self.driver.element_state(locator).await?.count)
    }

    /// Text of the first match, once attached (visibility not required)
    pub async fn text_content(&self, locator: &Locator) -> E2eResult<String> {
        self.wait_for(locator, WaitState::Attached, None).await?;
        Ok(self
            .driver
            .text_contents(locator)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    /// Text of every current match (no waiting)
    pub async fn all_text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        self.driver.text_contents(locator).await
    }

    /// Attribute of the single match, once attached
    pub async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        self.wait_for(locator, WaitState::Attached, None).await?;
        self.driver.attribute(locator, name).await
    }

    /// Current value of an input, once attached
    pub async fn input_value(&self, locator: &Locator) -> E2eResult<String> {
        self.wait_for(locator, WaitState::Attached, None).await?;
        self.driver.input_value(locator).await
    }

    /// One locator per current match
    pub async fn all(&self, locator: &Locator) -> E2eResult<Vec<Locator>> {
        let count = self.count(locator).await?;
        Ok((0..count).map(|i| locator.nth(i)).collect())
    }

    /// Evaluate a script in the page
    pub async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
        self.driver.evaluate(script).await
    }

    /// Cookies of the browsing context
    pub async fn cookies(&self) -> E2eResult<Vec<CookieInfo>> {
        self.driver.cookies().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement, MouseButton};
    use crate::environment::lookup;

    const BASE: &str = "https://demo.nopcommerce.com";

    fn setup(driver: MockDriver) -> (Arc<MockDriver>, Interactions) {
        let driver = Arc::new(driver);
        let ui = Interactions::new(driver.clone(), BASE, InteractionTimeouts::default());
        (driver, ui)
    }

    mod timeouts_tests {
        use super::*;

        #[test]
        fn test_staging_budget() {
            let timeouts = InteractionTimeouts::for_environment(lookup("staging").unwrap());
            assert_eq!(timeouts.action, Duration::from_millis(20_000));
            assert_eq!(timeouts.navigation, Duration::from_millis(45_000));
            assert_eq!(timeouts.safe, Duration::from_secs(10));
            assert_eq!(timeouts.expect, Duration::from_secs(10));
        }

        #[test]
        fn test_default_is_demo() {
            assert_eq!(
                InteractionTimeouts::default().action,
                Duration::from_millis(15_000)
            );
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_relative_paths_join_base() {
            let (_, ui) = setup(MockDriver::new());
            assert_eq!(ui.url_for("/login"), "https://demo.nopcommerce.com/login");
            assert_eq!(ui.url_for("books"), "https://demo.nopcommerce.com/books");
            assert_eq!(ui.url_for("/"), "https://demo.nopcommerce.com/");
        }

        #[test]
        fn test_trailing_slash_on_base() {
            let ui = Interactions::new(
                Arc::new(MockDriver::new()),
                "https://test.nopcommerce.com/",
                InteractionTimeouts::default(),
            );
            assert_eq!(ui.url_for("/search"), "https://test.nopcommerce.com/search");
        }

        #[test]
        fn test_absolute_urls_pass_through() {
            let (_, ui) = setup(MockDriver::new());
            assert_eq!(
                ui.url_for("https://example.com/x?y=1"),
                "https://example.com/x?y=1"
            );
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_navigate_loads_joined_url() {
            let (driver, ui) = setup(MockDriver::new());
            ui.navigate("/register").await.unwrap();
            assert_eq!(
                driver.history(),
                vec!["goto:https://demo.nopcommerce.com/register".to_string()]
            );
            assert_eq!(
                ui.current_url().await.unwrap(),
                "https://demo.nopcommerce.com/register"
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_navigate_bounded_by_budget() {
            let (_, ui) =
                setup(MockDriver::new().with_navigation_latency(Duration::from_secs(60)));
            let err = ui.navigate("/").await.unwrap_err();
            match err {
                E2eError::Timeout { ms, waited_for } => {
                    assert_eq!(ms, 30_000);
                    assert!(waited_for.contains("https://demo.nopcommerce.com/"));
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }
    }

    mod safe_click_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_clicks_once_visible() {
            let button = Locator::new("button.login-button");
            let (driver, ui) = setup(
                MockDriver::new()
                    .with_element(&button, MockElement::visible_after(Duration::from_secs(2))),
            );

            ui.safe_click(&button, &ClickOptions::default()).await.unwrap();

            assert_eq!(
                driver.history(),
                vec![
                    "scroll:button.login-button".to_string(),
                    "click:button.login-button".to_string()
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_never_visible_times_out_without_clicking() {
            let button = Locator::new("button.login-button");
            let (driver, ui) = setup(MockDriver::new().with_element(&button, MockElement::hidden()));

            let err = ui.click(&button).await.unwrap_err();

            assert!(matches!(err, E2eError::Timeout { ms: 10_000, .. }));
            assert!(!driver.was_called("click:"));
            assert!(!driver.was_called("scroll:"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_option_timeout_bounds_wait() {
            let button = Locator::new("#register-button");
            let (driver, ui) = setup(
                MockDriver::new()
                    .with_element(&button, MockElement::visible_after(Duration::from_secs(2))),
            );
            let options = ClickOptions::new().with_timeout(Duration::from_secs(1));

            let err = ui.safe_click(&button, &options).await.unwrap_err();

            assert!(matches!(err, E2eError::Timeout { ms: 1000, .. }));
            assert!(!driver.was_called("click:"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_timeout_not_forwarded() {
            let link = Locator::new("a.ico-login");
            let (driver, ui) = setup(MockDriver::new().with_element(&link, MockElement::visible()));
            let options = ClickOptions::new()
                .with_button(MouseButton::Middle)
                .with_timeout(Duration::from_secs(5));

            ui.click_with(&link, &options).await.unwrap();

            let forwarded = driver.last_click_options().unwrap();
            assert_eq!(forwarded.button, MouseButton::Middle);
            assert!(forwarded.timeout.is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn test_driver_failure_propagates() {
            let button = Locator::new("#register-button");
            let (_, ui) = setup(MockDriver::new().with_element(
                &button,
                MockElement::visible().with_click_error("node is detached"),
            ));
            let err = ui.click(&button).await.unwrap_err();
            assert!(matches!(err, E2eError::ActionError { .. }));
        }
    }

    mod select_tests {
        use super::*;

        fn sort() -> Locator {
            Locator::new("#products-orderby")
        }

        fn sort_element() -> MockElement {
            MockElement::visible().with_options(["Position", "Price: Low to High"])
        }

        #[tokio::test(start_paused = true)]
        async fn test_select_then_enter() {
            let (driver, ui) = setup(MockDriver::new().with_element(&sort(), sort_element()));
            ui.safe_select_option(&sort(), "Price: Low to High", None)
                .await
                .unwrap();
            assert_eq!(
                driver.history(),
                vec![
                    "select:#products-orderby=Price: Low to High".to_string(),
                    "press:Enter".to_string()
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_label() {
            let (driver, ui) = setup(MockDriver::new().with_element(&sort(), sort_element()));
            let err = ui
                .safe_select_option(&sort(), "Popularity", None)
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::OptionNotFound { ref label, .. } if label == "Popularity"));
            assert!(!driver.was_called("press:"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_hidden_select_times_out() {
            let (_, ui) = setup(MockDriver::new().with_element(&sort(), MockElement::hidden()));
            let err = ui
                .safe_select_option(&sort(), "Position", Some(Duration::from_secs(2)))
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::Timeout { ms: 2000, .. }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_plain_select_does_not_press_enter() {
            let (driver, ui) = setup(MockDriver::new().with_element(&sort(), sort_element()));
            ui.select_option(&sort(), "Position").await.unwrap();
            assert!(!driver.was_called("press:"));
        }
    }

    mod wait_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_wait_for_element_visible_then_attached() {
            let title = Locator::new(".page-title h1");
            let (_, ui) = setup(
                MockDriver::new()
                    .with_element(&title, MockElement::visible_after(Duration::from_secs(3))),
            );
            ui.wait_for_element(&title, None).await.unwrap();
        }

        #[tokio::test(start_paused = true)]
        async fn test_wait_for_element_times_out() {
            let title = Locator::new(".page-title h1");
            let (_, ui) = setup(MockDriver::new());
            let err = ui
                .wait_for_element(&title, Some(Duration::from_millis(500)))
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::Timeout { ms: 500, .. }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_ajax_indicator_never_appears() {
            let (_, ui) = setup(MockDriver::new());
            let outcome = ui.wait_for_ajax_complete().await.unwrap();
            assert!(!outcome.tolerant_met);
        }

        #[tokio::test(start_paused = true)]
        async fn test_ajax_indicator_appears_then_hides() {
            let busy = Locator::new(AJAX_BUSY_SELECTOR);
            let (_, ui) = setup(MockDriver::new().with_element(
                &busy,
                MockElement::visible_between(Duration::from_millis(200), Duration::from_secs(14)),
            ));
            let outcome = ui.wait_for_ajax_complete().await.unwrap();
            assert!(outcome.tolerant_met);
        }

        #[tokio::test(start_paused = true)]
        async fn test_ajax_indicator_stuck() {
            let busy = Locator::new(AJAX_BUSY_SELECTOR);
            let (_, ui) = setup(MockDriver::new().with_element(&busy, MockElement::visible()));
            let err = ui.wait_for_ajax_complete().await.unwrap_err();
            assert!(matches!(err, E2eError::Timeout { ms: 15_000, .. }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_unbounded_wait_uses_action_budget() {
            let (_, ui) = setup(MockDriver::new());
            let err = ui
                .wait_for(&Locator::new("#nothing"), WaitState::Visible, None)
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::Timeout { ms: 15_000, .. }));
        }
    }

    mod read_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_fill_and_read_back() {
            let search = Locator::new("#small-searchterms");
            let (_, ui) = setup(MockDriver::new().with_element(&search, MockElement::visible()));
            ui.fill(&search, "laptop").await.unwrap();
            assert_eq!(ui.input_value(&search).await.unwrap(), "laptop");
        }

        #[tokio::test(start_paused = true)]
        async fn test_check_and_uncheck() {
            let remember = Locator::new("#RememberMe");
            let (driver, ui) =
                setup(MockDriver::new().with_element(&remember, MockElement::visible()));
            ui.check(&remember).await.unwrap();
            assert!(driver.element(&remember).unwrap().checked);
            ui.uncheck(&remember).await.unwrap();
            assert!(!driver.element(&remember).unwrap().checked);
        }

        #[tokio::test(start_paused = true)]
        async fn test_text_content_takes_first() {
            let title = Locator::new(".page-title h1");
            let (_, ui) = setup(
                MockDriver::new().with_element(&title, MockElement::visible().with_text("Welcome")),
            );
            assert_eq!(ui.text_content(&title).await.unwrap(), "Welcome");
        }

        #[tokio::test(start_paused = true)]
        async fn test_reads_need_attached_not_visible() {
            let token = Locator::new("input[name=__RequestVerificationToken]");
            let note = Locator::new(".result");
            let (_, ui) = setup(
                MockDriver::new()
                    .with_element(&token, MockElement::hidden().with_attribute("type", "hidden"))
                    .with_element(&note, MockElement::hidden().with_text("collapsed")),
            );
            let started = tokio::time::Instant::now();
            assert_eq!(
                ui.attribute(&token, "type").await.unwrap().as_deref(),
                Some("hidden")
            );
            assert_eq!(ui.text_content(&note).await.unwrap(), "collapsed");
            assert!(started.elapsed() < Duration::from_secs(1));
        }

        #[tokio::test(start_paused = true)]
        async fn test_read_of_missing_element_times_out() {
            let (_, ui) = setup(MockDriver::new());
            let err = ui.text_content(&Locator::new(".nothing")).await.unwrap_err();
            assert!(matches!(err, E2eError::Timeout { ms: 15_000, .. }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_is_visible_does_not_wait() {
            let logout = Locator::new("a.ico-logout");
            let (_, ui) = setup(MockDriver::new().with_element(
                &logout,
                MockElement::visible_after(Duration::from_secs(1)),
            ));
            assert!(!ui.is_visible(&logout).await.unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_all_yields_nth_locators() {
            let items = Locator::new(".product-item");
            let (_, ui) =
                setup(MockDriver::new().with_element(&items, MockElement::visible().with_count(3)));
            let all = ui.all(&items).await.unwrap();
            assert_eq!(all.len(), 3);
            assert_eq!(all[2].to_string(), ".product-item >> nth=2");
        }

        #[tokio::test(start_paused = true)]
        async fn test_attribute() {
            let logo = Locator::new(".header-logo a");
            let (_, ui) = setup(
                MockDriver::new()
                    .with_element(&logo, MockElement::visible().with_attribute("href", "/")),
            );
            assert_eq!(
                ui.attribute(&logo, "href").await.unwrap().as_deref(),
                Some("/")
            );
        }
    }
}
