//! Locators: lazy, chainable references to elements in the current document.
//!
//! A [`Locator`] never holds an element handle. It is a chain of [`Step`]s that is
//! turned into a JavaScript expression and re-evaluated against the live DOM every
//! time a driver touches it, so a locator built before a navigation stays valid
//! after it.
//!
//! - **Strict by default**: waits and actions fail when more than one element matches
//! - **Scoped chaining**: `locator.locator(".child")` searches under every element
//!   matched so far
//! - **Filters**: `with_text` keeps elements whose text contains a fragment; `nth`,
//!   `first` and `last` pick a single element

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in CSS pixels, relative to an element's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Selector type for one locator step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "button.login-button")
    Css(String),
    /// XPath selector, evaluated relative to the scope element
    XPath(String),
    /// Innermost elements whose text contains the fragment
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// JavaScript expression yielding an array of the elements this selector
    /// matches under the element bound to `root`
    #[must_use]
    pub fn to_query(&self, root: &str) -> String {
        match self {
            Self::Css(s) => format!("Array.from({root}.querySelectorAll({}))", js_string(s)),
            Self::XPath(s) => format!(
                "(() => {{ const x = document.evaluate({}, {root}, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < x.snapshotLength; i++) out.push(x.snapshotItem(i)); \
                 return out; }})()",
                js_string(s)
            ),
            Self::Text(t) => {
                let t = js_string(t);
                format!(
                    "Array.from({root}.querySelectorAll('*')).filter(el => \
                     (el.textContent || '').includes({t}) && \
                     !Array.from(el.children).some(c => (c.textContent || '').includes({t})))"
                )
            }
            Self::TestId(id) => format!(
                "Array.from({root}.querySelectorAll({}))",
                js_string(&format!("[data-testid=\"{id}\"]"))
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t:?}"),
            Self::TestId(id) => write!(f, "data-testid={id}"),
        }
    }
}

/// One link of a locator chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Descend: match the selector under every element matched so far
    Query(Selector),
    /// Keep elements whose normalized text contains the fragment (case-insensitive)
    HasText(String),
    /// Keep only the element at this index
    Nth(usize),
    /// Keep only the last element
    Last,
}

impl Step {
    fn to_js(&self) -> String {
        match self {
            Self::Query(selector) => format!(
                "els = Array.from(new Set(els.flatMap(r => {})));",
                selector.to_query("r")
            ),
            Self::HasText(text) => format!(
                "els = els.filter(el => (el.textContent || '').replace(/\\s+/g, ' ')\
                 .toLowerCase().includes({}));",
                js_string(&normalize_text(text).to_lowercase())
            ),
            Self::Nth(n) => format!("els = els.slice({n}, {});", n.saturating_add(1)),
            Self::Last => "els = els.slice(-1);".to_string(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(selector) => write!(f, "{selector}"),
            Self::HasText(text) => write!(f, "has-text={text:?}"),
            Self::Nth(n) => write!(f, "nth={n}"),
            Self::Last => write!(f, "nth=-1"),
        }
    }
}

/// A lazily-resolved reference to zero or more elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    steps: Vec<Step>,
    strict: bool,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            steps: vec![Step::Query(selector)],
            strict: true,
        }
    }

    /// Scope a CSS selector under this locator
    #[must_use]
    pub fn locator(&self, selector: impl Into<String>) -> Self {
        self.locator_selector(Selector::Css(selector.into()))
    }

    /// Scope any selector under this locator
    #[must_use]
    pub fn locator_selector(&self, selector: Selector) -> Self {
        self.push(Step::Query(selector))
    }

    /// Filter by text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Step::HasText(text.into()))
    }

    /// Pick the element at `index` (zero-based)
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.push(Step::Nth(index))
    }

    /// Pick the first element
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Pick the last element
    #[must_use]
    pub fn last(&self) -> Self {
        self.push(Step::Last)
    }

    /// Disable strict mode (allow multiple matches)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether waits and actions reject multiple matches
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// The step chain
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// JavaScript expression yielding the array of currently matched elements
    #[must_use]
    pub fn to_js(&self) -> String {
        let body: Vec<String> = self.steps.iter().map(Step::to_js).collect();
        format!(
            "(() => {{ let els = [document]; {} return els; }})()",
            body.join(" ")
        )
    }

    /// JavaScript expression yielding the match count
    #[must_use]
    pub fn to_count_js(&self) -> String {
        format!("{}.length", self.to_js())
    }

    fn push(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            steps,
            strict: self.strict,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Quote a string as a JavaScript string literal
#[must_use]
pub fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Collapse runs of whitespace and trim, the way rendered text is compared
#[must_use]
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
