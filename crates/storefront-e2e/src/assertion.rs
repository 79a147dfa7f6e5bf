//! Auto-retrying assertions.
//!
//! `expect(&ui, locator).to_be_visible().await?` re-reads the page every poll
//! interval until the condition holds or the expect budget (10 s by default)
//! runs out. Failures carry the last observed value.
//!
//! ```ignore
//! expect(&ui, page.success_message.clone())
//!     .to_contain_text("Your registration completed")
//!     .await?;
//! expect_page(&ui).to_have_url(r"/search\?q=").await?;
//! ```

use crate::driver::ElementState;
use crate::interaction::Interactions;
use crate::locator::{normalize_text, Locator};
use crate::result::{E2eError, E2eResult};
use regex::Regex;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// A condition on a locator
#[derive(Debug, Clone)]
pub enum ExpectAssertion {
    /// Rendered
    IsVisible,
    /// Not rendered or not in the document
    IsHidden,
    /// Whitespace-normalized text equals
    HasText(String),
    /// Whitespace-normalized text contains
    ContainsText(String),
    /// Exactly this many matches
    HasCount(usize),
    /// Attribute value matches a pattern
    HasAttribute {
        /// Attribute name
        name: String,
        /// Pattern the value must match
        pattern: Regex,
    },
}

/// What one poll read back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// Element snapshot
    pub state: ElementState,
    /// Text of the first match (text assertions only)
    pub text: Option<String>,
    /// Attribute value (attribute assertions only)
    pub attribute: Option<String>,
}

impl ExpectAssertion {
    /// Whether an observation satisfies the condition
    #[must_use]
    pub fn is_met(&self, observed: &Observation) -> bool {
        match self {
            Self::IsVisible => observed.state.visible,
            Self::IsHidden => !observed.state.visible,
            Self::HasText(expected) => observed
                .text
                .as_deref()
                .is_some_and(|t| normalize_text(t) == normalize_text(expected)),
            Self::ContainsText(expected) => observed
                .text
                .as_deref()
                .is_some_and(|t| normalize_text(t).contains(&normalize_text(expected))),
            Self::HasCount(expected) => observed.state.count == *expected,
            Self::HasAttribute { pattern, .. } => observed
                .attribute
                .as_deref()
                .is_some_and(|v| pattern.is_match(v)),
        }
    }

    /// The observed value worth reporting on failure
    #[must_use]
    pub fn describe_actual(&self, observed: &Observation) -> String {
        match self {
            Self::IsVisible | Self::IsHidden => {
                if observed.state.visible {
                    "visible".to_string()
                } else if observed.state.attached {
                    "hidden".to_string()
                } else {
                    "detached".to_string()
                }
            }
            Self::HasText(_) | Self::ContainsText(_) => {
                observed.text.as_deref().map_or_else(|| "no element".to_string(), |t| format!("{t:?}"))
            }
            Self::HasCount(_) => observed.state.count.to_string(),
            Self::HasAttribute { .. } => observed
                .attribute
                .as_deref()
                .map_or_else(|| "no attribute".to_string(), |v| format!("{v:?}")),
        }
    }

    const fn reads_text(&self) -> bool {
        matches!(self, Self::HasText(_) | Self::ContainsText(_))
    }

    /// Count assertions are the only ones allowed several matches
    const fn is_strict(&self) -> bool {
        !matches!(self, Self::HasCount(_))
    }
}

impl fmt::Display for ExpectAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsVisible => f.write_str("to be visible"),
            Self::IsHidden => f.write_str("to be hidden"),
            Self::HasText(t) => write!(f, "to have text {t:?}"),
            Self::ContainsText(t) => write!(f, "to contain text {t:?}"),
            Self::HasCount(n) => write!(f, "to have count {n}"),
            Self::HasAttribute { name, pattern } => {
                write!(f, "to have attribute {name} matching /{pattern}/")
            }
        }
    }
}

/// Assertion builder for a locator
#[derive(Debug, Clone)]
pub struct Expect {
    ui: Interactions,
    locator: Locator,
    timeout: Duration,
}

/// Start an assertion on `locator`
#[must_use]
pub fn expect(ui: &Interactions, locator: Locator) -> Expect {
    Expect::new(ui, locator)
}

impl Expect {
    #[must_use]
    pub fn new(ui: &Interactions, locator: Locator) -> Self {
        Self {
            timeout: ui.timeouts().expect,
            ui: ui.clone(),
            locator,
        }
    }

    /// Override the budget
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn to_be_visible(&self) -> E2eResult<()> {
        self.satisfy(ExpectAssertion::IsVisible).await
    }

    pub async fn to_be_hidden(&self) -> E2eResult<()> {
        self.satisfy(ExpectAssertion::IsHidden).await
    }

    pub async fn to_have_text(&self, expected: &str) -> E2eResult<()> {
        self.satisfy(ExpectAssertion::HasText(expected.to_string()))
            .await
    }

    pub async fn to_contain_text(&self, expected: &str) -> E2eResult<()> {
        self.satisfy(ExpectAssertion::ContainsText(expected.to_string()))
            .await
    }

    pub async fn to_have_count(&self, expected: usize) -> E2eResult<()> {
        self.satisfy(ExpectAssertion::HasCount(expected)).await
    }

    /// Attribute value must match the regular expression `pattern`
    pub async fn to_have_attribute(&self, name: &str, pattern: &str) -> E2eResult<()> {
        let pattern = compile(pattern)?;
        self.satisfy(ExpectAssertion::HasAttribute {
            name: name.to_string(),
            pattern,
        })
        .await
    }

    /// Poll until `assertion` holds
    pub async fn satisfy(&self, assertion: ExpectAssertion) -> E2eResult<()> {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let poll = self.ui.timeouts().poll_interval;

        loop {
            let observed = self.observe(&assertion).await?;
            if assertion.is_strict() && self.locator.is_strict() && observed.state.count > 1 {
                return Err(E2eError::StrictModeViolation {
                    locator: self.locator.to_string(),
                    count: observed.state.count,
                });
            }
            if assertion.is_met(&observed) {
                tracing::trace!(locator = %self.locator, %assertion, "expectation met");
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(E2eError::assertion(format!(
                    "expected `{}` {assertion}, last observed {} after {} ms",
                    self.locator,
                    assertion.describe_actual(&observed),
                    self.timeout.as_millis()
                )));
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }

    async fn observe(&self, assertion: &ExpectAssertion) -> E2eResult<Observation> {
        let driver = self.ui.driver();
        let state = driver.element_state(&self.locator).await?;
        let text = if assertion.reads_text() && state.attached {
            driver.text_contents(&self.locator).await?.into_iter().next()
        } else {
            None
        };
        let attribute = match assertion {
            ExpectAssertion::HasAttribute { name, .. } if state.attached => {
                driver.attribute(&self.locator, name).await?
            }
            _ => None,
        };
        Ok(Observation {
            state,
            text,
            attribute,
        })
    }
}

/// Assertion builder for the current document
#[derive(Debug, Clone)]
pub struct PageExpect {
    ui: Interactions,
    timeout: Duration,
}

/// Start an assertion on the current document
#[must_use]
pub fn expect_page(ui: &Interactions) -> PageExpect {
    PageExpect {
        ui: ui.clone(),
        timeout: ui.timeouts().expect,
    }
}

impl PageExpect {
    /// Override the budget
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL must match the regular expression `pattern`
    pub async fn to_have_url(&self, pattern: &str) -> E2eResult<()> {
        let re = &compile(pattern)?;
        self.poll(&format!("URL matching /{pattern}/"), |ui| async move {
            let url = ui.current_url().await?;
            Ok((re.is_match(&url), url))
        })
        .await
    }

    /// Title must equal `expected`
    pub async fn to_have_title(&self, expected: &str) -> E2eResult<()> {
        self.poll(&format!("title {expected:?}"), |ui| async move {
            let title = ui.title().await?;
            Ok((title == expected, title))
        })
        .await
    }

    async fn poll<'a, F, Fut>(&'a self, what: &str, mut probe: F) -> E2eResult<()>
    where
        F: FnMut(&'a Interactions) -> Fut,
        Fut: std::future::Future<Output = E2eResult<(bool, String)>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            let (met, actual) = probe(&self.ui).await?;
            if met {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(E2eError::assertion(format!(
                    "expected page {what}, last observed {actual:?} after {} ms",
                    self.timeout.as_millis()
                )));
            }
            tokio::time::sleep(self.ui.timeouts().poll_interval.min(deadline - now)).await;
        }
    }
}

fn compile(pattern: &str) -> E2eResult<Regex> {
    Regex::new(pattern).map_err(|e| E2eError::Config {
        message: format!("invalid pattern /{pattern}/: {e}"),
    })
}
