//! Wait mechanisms.
//!
//! Every wait is a poll of [`Driver::element_state`] on the tokio clock: cheap
//! probes every 50 ms until the condition holds or the budget runs out. A
//! zero budget still probes once.

use crate::driver::{Driver, ElementState};
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Visibility budget of safe clicks, safe selects and `wait_for_element` (10 seconds)
pub const DEFAULT_SAFE_TIMEOUT_MS: u64 = 10_000;

/// How long a busy indicator is given to show up (3 seconds)
pub const AJAX_APPEAR_TIMEOUT_MS: u64 = 3_000;

/// How long a busy indicator may stay up (15 seconds)
pub const AJAX_SETTLE_TIMEOUT_MS: u64 = 15_000;

// =============================================================================
// WAIT STATE
// =============================================================================

/// Element states a wait can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitState {
    /// Attached and rendered
    Visible,
    /// Not rendered, or not in the document at all
    Hidden,
    /// In the document, rendered or not
    Attached,
    /// Not in the document
    Detached,
}

impl WaitState {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Attached => "attached",
            Self::Detached => "detached",
        }
    }

    /// Whether a snapshot satisfies this state
    #[must_use]
    pub const fn is_satisfied_by(&self, state: &ElementState) -> bool {
        match self {
            Self::Visible => state.visible,
            Self::Hidden => !state.visible,
            Self::Attached => state.attached,
            Self::Detached => !state.attached,
        }
    }
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_SAFE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the given budget
    #[must_use]
    pub fn within(timeout: Duration) -> Self {
        Self::new().with_timeout(timeout.as_millis() as u64)
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a wait result
    #[must_use]
    pub fn success(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Wait until `locator` reaches `state`.
///
/// Strict locators fail as soon as more than one element matches.
pub async fn wait_for_state(
    driver: &dyn Driver,
    locator: &Locator,
    state: WaitState,
    options: &WaitOptions,
) -> E2eResult<WaitResult> {
    let waited_for = format!("`{locator}` to be {state}");
    let start = Instant::now();
    let deadline = start + options.timeout();

    loop {
        let current = driver.element_state(locator).await?;
        if locator.is_strict() && current.count > 1 {
            return Err(E2eError::StrictModeViolation {
                locator: locator.to_string(),
                count: current.count,
            });
        }
        if state.is_satisfied_by(&current) {
            tracing::trace!(%locator, %state, elapsed_ms = start.elapsed().as_millis() as u64, "wait satisfied");
            return Ok(WaitResult::success(start.elapsed(), waited_for));
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(E2eError::timeout(options.timeout_ms, waited_for));
        }
        tokio::time::sleep(options.poll_interval().min(deadline - now)).await;
    }
}

// =============================================================================
// TWO-PHASE WAIT
// =============================================================================

/// A best-effort wait followed by a mandatory one.
///
/// The tolerant phase gives a transient element (a spinner, a busy overlay) the
/// chance to show up; whatever happens there is only logged. The mandatory phase
/// then must succeed, and its error is the one surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoPhaseWait {
    /// State the tolerant phase waits for
    pub tolerant_state: WaitState,
    /// Budget of the tolerant phase
    pub tolerant_timeout: Duration,
    /// State the mandatory phase requires
    pub mandatory_state: WaitState,
    /// Budget of the mandatory phase
    pub mandatory_timeout: Duration,
    /// Polling interval of both phases
    pub poll_interval: Duration,
}

/// What a [`TwoPhaseWait`] observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoPhaseOutcome {
    /// Whether the tolerant phase saw its state
    pub tolerant_met: bool,
    /// Total time spent
    pub elapsed: Duration,
}

impl TwoPhaseWait {
    /// Appear within `appear` (optional), then disappear within `settle` (required)
    #[must_use]
    pub const fn appear_then_hide(appear: Duration, settle: Duration) -> Self {
        Self {
            tolerant_state: WaitState::Visible,
            tolerant_timeout: appear,
            mandatory_state: WaitState::Hidden,
            mandatory_timeout: settle,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// The busy-indicator wait used after in-place listing refreshes
    #[must_use]
    pub const fn ajax() -> Self {
        Self::appear_then_hide(
            Duration::from_millis(AJAX_APPEAR_TIMEOUT_MS),
            Duration::from_millis(AJAX_SETTLE_TIMEOUT_MS),
        )
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run both phases against `locator`
    pub async fn run(&self, driver: &dyn Driver, locator: &Locator) -> E2eResult<TwoPhaseOutcome> {
        let start = Instant::now();
        let poll_interval_ms = self.poll_interval.as_millis() as u64;

        let tolerant = WaitOptions::within(self.tolerant_timeout).with_poll_interval(poll_interval_ms);
        let tolerant_met = match wait_for_state(driver, locator, self.tolerant_state, &tolerant).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(%locator, error = %e, "tolerant wait not met, continuing");
                false
            }
        };

        let mandatory =
            WaitOptions::within(self.mandatory_timeout).with_poll_interval(poll_interval_ms);
        wait_for_state(driver, locator, self.mandatory_state, &mandatory).await?;

        Ok(TwoPhaseOutcome {
            tolerant_met,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};

    mod wait_state_tests {
        use super::*;

        #[test]
        fn test_as_str() {
            assert_eq!(WaitState::Visible.as_str(), "visible");
            assert_eq!(WaitState::Hidden.to_string(), "hidden");
            assert_eq!(WaitState::Attached.as_str(), "attached");
            assert_eq!(WaitState::Detached.as_str(), "detached");
        }

        #[test]
        fn test_hidden_covers_detached() {
            assert!(WaitState::Hidden.is_satisfied_by(&ElementState::DETACHED));
            assert!(WaitState::Hidden.is_satisfied_by(&ElementState::hidden(1)));
            assert!(!WaitState::Hidden.is_satisfied_by(&ElementState::visible(1)));
        }

        #[test]
        fn test_attached_ignores_visibility() {
            assert!(WaitState::Attached.is_satisfied_by(&ElementState::hidden(1)));
            assert!(!WaitState::Detached.is_satisfied_by(&ElementState::hidden(1)));
        }
    }

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let options = WaitOptions::default();
            assert_eq!(options.timeout(), Duration::from_secs(10));
            assert_eq!(options.poll_interval(), Duration::from_millis(50));
        }

        #[test]
        fn test_within() {
            assert_eq!(WaitOptions::within(Duration::from_secs(3)).timeout_ms, 3000);
        }
    }

    mod polling_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_wait_returns_once_visible() {
            let spinner = Locator::new(".ajax-products-busy");
            let driver = MockDriver::new()
                .with_element(&spinner, MockElement::visible_after(Duration::from_secs(2)));

            let result = wait_for_state(&driver, &spinner, WaitState::Visible, &WaitOptions::new())
                .await
                .unwrap();
            assert!(result.elapsed >= Duration::from_secs(2));
            assert!(result.elapsed < Duration::from_millis(2100));
        }

        #[tokio::test(start_paused = true)]
        async fn test_wait_times_out_at_budget() {
            let missing = Locator::new("#never");
            let driver = MockDriver::new();
            let started = Instant::now();

            let err = wait_for_state(
                &driver,
                &missing,
                WaitState::Visible,
                &WaitOptions::new().with_timeout(1500),
            )
            .await
            .unwrap_err();

            match err {
                E2eError::Timeout { ms, waited_for } => {
                    assert_eq!(ms, 1500);
                    assert!(waited_for.contains("#never"));
                    assert!(waited_for.contains("visible"));
                }
                other => panic!("expected timeout, got {other:?}"),
            }
            assert!(started.elapsed() >= Duration::from_millis(1500));
            assert!(started.elapsed() < Duration::from_millis(1550));
        }

        #[tokio::test(start_paused = true)]
        async fn test_zero_budget_probes_once() {
            let logo = Locator::new(".header-logo a");
            let driver = MockDriver::new().with_element(&logo, MockElement::visible());
            let result = wait_for_state(
                &driver,
                &logo,
                WaitState::Visible,
                &WaitOptions::new().with_timeout(0),
            )
            .await
            .unwrap();
            assert_eq!(result.elapsed, Duration::ZERO);
        }

        #[tokio::test(start_paused = true)]
        async fn test_strict_violation() {
            let items = Locator::new(".product-item");
            let driver =
                MockDriver::new().with_element(&items, MockElement::visible().with_count(6));
            let err = wait_for_state(&driver, &items, WaitState::Visible, &WaitOptions::new())
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                E2eError::StrictModeViolation { count: 6, .. }
            ));
        }

        #[tokio::test(start_paused = true)]
        async fn test_non_strict_accepts_many() {
            let items = Locator::new(".product-item").with_strict(false);
            let driver =
                MockDriver::new().with_element(&items, MockElement::visible().with_count(6));
            assert!(
                wait_for_state(&driver, &items, WaitState::Attached, &WaitOptions::new())
                    .await
                    .is_ok()
            );
        }
    }

    mod two_phase_tests {
        use super::*;

        fn busy() -> Locator {
            Locator::new(".ajax-products-busy")
        }

        #[tokio::test(start_paused = true)]
        async fn test_indicator_never_appears() {
            let driver = MockDriver::new();
            let outcome = TwoPhaseWait::ajax().run(&driver, &busy()).await.unwrap();
            assert!(!outcome.tolerant_met);
            assert!(outcome.elapsed >= Duration::from_secs(3));
            assert!(outcome.elapsed < Duration::from_millis(3050));
        }

        #[tokio::test(start_paused = true)]
        async fn test_indicator_appears_then_hides() {
            let driver = MockDriver::new().with_element(
                &busy(),
                MockElement::visible_between(Duration::from_millis(500), Duration::from_secs(8)),
            );
            let outcome = TwoPhaseWait::ajax().run(&driver, &busy()).await.unwrap();
            assert!(outcome.tolerant_met);
            assert!(outcome.elapsed >= Duration::from_secs(8));
            assert!(outcome.elapsed < Duration::from_millis(8100));
        }

        #[tokio::test(start_paused = true)]
        async fn test_indicator_stuck_fails_after_settle_budget() {
            let driver = MockDriver::new().with_element(&busy(), MockElement::visible());
            let err = TwoPhaseWait::ajax().run(&driver, &busy()).await.unwrap_err();
            assert!(matches!(err, E2eError::Timeout { ms: 15_000, .. }));
        }

        #[tokio::test(start_paused = true)]
        async fn test_tolerant_phase_swallows_strict_violation() {
            let driver = MockDriver::new()
                .with_element(&busy(), MockElement::visible().with_count(2));
            let err = TwoPhaseWait::ajax().run(&driver, &busy()).await.unwrap_err();
            assert!(matches!(err, E2eError::StrictModeViolation { .. }));
        }
    }
}
