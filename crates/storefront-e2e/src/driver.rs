//! Driver - the browser automation seam.
//!
//! Everything above this module talks to the browser through the [`Driver`]
//! trait. Two implementations exist:
//!
//! - `ChromiumDriver` (in [`crate::browser`], `browser` feature) drives Chromium
//!   over the `DevTools` protocol
//! - [`MockDriver`] is a scripted, in-process DOM for unit tests; element
//!   visibility can be scheduled on the tokio clock so waits run on virtual time
//!
//! Drivers are deliberately dumb: they resolve a [`Locator`] and act once.
//! Readiness waits and strictness live in [`crate::wait`] and
//! [`crate::interaction`].

use crate::locator::{Locator, Point};
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Snapshot of what a locator currently resolves to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Number of matching elements
    pub count: usize,
    /// Whether at least one element is in the document
    pub attached: bool,
    /// Whether the first match is rendered with a non-empty box
    pub visible: bool,
}

impl ElementState {
    /// Nothing matches
    pub const DETACHED: Self = Self {
        count: 0,
        attached: false,
        visible: false,
    };

    /// `count` matches, first one visible
    #[must_use]
    pub const fn visible(count: usize) -> Self {
        Self {
            count,
            attached: count > 0,
            visible: count > 0,
        }
    }

    /// `count` matches, none rendered
    #[must_use]
    pub const fn hidden(count: usize) -> Self {
        Self {
            count,
            attached: count > 0,
            visible: false,
        }
    }
}

/// Mouse button for clicks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Primary button
    #[default]
    Left,
    /// Secondary button
    Right,
    /// Wheel button
    Middle,
}

/// Keyboard modifier held during a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Alt / Option
    Alt,
    /// Control
    Control,
    /// Meta / Command
    Meta,
    /// Shift
    Shift,
}

impl Modifier {
    /// `DevTools` modifier bit
    #[must_use]
    pub const fn bit(self) -> i64 {
        match self {
            Self::Alt => 1,
            Self::Control => 2,
            Self::Meta => 4,
            Self::Shift => 8,
        }
    }
}

/// Click options.
///
/// `timeout` bounds the visibility wait of a safe click; drivers never see it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOptions {
    /// Mouse button
    pub button: MouseButton,
    /// 1 for click, 2 for double click
    pub click_count: u32,
    /// Modifiers held during the click
    pub modifiers: Vec<Modifier>,
    /// Offset from the element's top-left corner (center when `None`)
    pub position: Option<Point>,
    /// Delay between press and release
    pub delay: Option<Duration>,
    /// Skip actionability checks
    pub force: bool,
    /// Perform checks only, do not click
    pub trial: bool,
    /// Visibility wait budget for safe clicks
    pub timeout: Option<Duration>,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            button: MouseButton::Left,
            click_count: 1,
            modifiers: Vec::new(),
            position: None,
            delay: None,
            force: false,
            trial: false,
            timeout: None,
        }
    }
}

impl ClickOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mouse button
    #[must_use]
    pub const fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Set the click count
    #[must_use]
    pub const fn with_click_count(mut self, count: u32) -> Self {
        self.click_count = count;
        self
    }

    /// Hold a modifier during the click
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Click at an offset instead of the center
    #[must_use]
    pub const fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the visibility wait budget
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The options a driver receives: everything except the timeout
    #[must_use]
    pub fn without_timeout(&self) -> Self {
        Self {
            timeout: None,
            ..self.clone()
        }
    }

    /// Combined `DevTools` modifier mask
    #[must_use]
    pub fn modifier_mask(&self) -> i64 {
        self.modifiers.iter().fold(0, |mask, m| mask | m.bit())
    }
}

/// A browser cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieInfo {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain
    pub domain: String,
    /// Path
    pub path: String,
    /// Expiry as seconds since the epoch (`None` for session cookies)
    pub expires: Option<f64>,
    /// HTTP-only flag
    pub http_only: bool,
    /// Secure flag
    pub secure: bool,
}

impl CookieInfo {
    /// Create a session cookie for `/`
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            expires: None,
            http_only: false,
            secure: false,
        }
    }
}

/// Screenshot data
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Timestamp when screenshot was taken
    pub timestamp: std::time::SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            timestamp: std::time::SystemTime::now(),
        }
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if screenshot is valid (has data)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }

    /// Write the PNG to disk
    pub fn save(&self, path: impl AsRef<Path>) -> E2eResult<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

/// Abstract driver trait for browser automation.
///
/// One driver instance is one isolated browsing context.
#[async_trait]
pub trait Driver: Send + Sync + fmt::Debug {
    /// Navigate to an absolute URL and wait for the load event
    async fn goto(&self, url: &str) -> E2eResult<()>;

    /// Current document URL
    async fn current_url(&self) -> E2eResult<String>;

    /// Current document title
    async fn title(&self) -> E2eResult<String>;

    /// Probe what the locator resolves to right now
    async fn element_state(&self, locator: &Locator) -> E2eResult<ElementState>;

    /// Scroll the first match into the viewport
    async fn scroll_into_view(&self, locator: &Locator) -> E2eResult<()>;

    /// Click the first match
    async fn click(&self, locator: &Locator, options: &ClickOptions) -> E2eResult<()>;

    /// Replace the value of an input
    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()>;

    /// Set a checkbox or radio state
    async fn set_checked(&self, locator: &Locator, checked: bool) -> E2eResult<()>;

    /// Select the `<option>` whose label matches
    async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()>;

    /// Press a key on the focused element (e.g. `"Enter"`)
    async fn press_key(&self, key: &str) -> E2eResult<()>;

    /// Text content of every match, in document order
    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>>;

    /// Attribute of the first match
    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>>;

    /// Value of the first matching input
    async fn input_value(&self, locator: &Locator) -> E2eResult<String>;

    /// Evaluate a script in the page
    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value>;

    /// Cookies visible to the current document
    async fn cookies(&self) -> E2eResult<Vec<CookieInfo>>;

    /// Capture the viewport
    async fn screenshot(&self) -> E2eResult<Screenshot>;

    /// Close the browsing context
    async fn close(&self) -> E2eResult<()>;
}

/// A scripted element for [`MockDriver`].
///
/// Visibility is a window on the tokio clock measured from driver creation:
/// visible from `visible_from` (never when `None`) until `hidden_from`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockElement {
    /// Number of matches
    pub count: usize,
    /// When the element becomes visible
    pub visible_from: Option<Duration>,
    /// When the element stops being visible
    pub hidden_from: Option<Duration>,
    /// Text of each match
    pub texts: Vec<String>,
    /// Attributes of the first match
    pub attributes: HashMap<String, String>,
    /// Input value
    pub value: String,
    /// Checkbox state
    pub checked: bool,
    /// `<option>` labels
    pub options: Vec<String>,
    /// Selected option label
    pub selected: Option<String>,
    /// Error returned by clicks
    pub click_error: Option<String>,
}

impl MockElement {
    /// A single element that is visible immediately
    #[must_use]
    pub fn visible() -> Self {
        Self {
            count: 1,
            visible_from: Some(Duration::ZERO),
            ..Self::default()
        }
    }

    /// A single element in the DOM that never renders
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            count: 1,
            ..Self::default()
        }
    }

    /// A single element that becomes visible after `delay`
    #[must_use]
    pub fn visible_after(delay: Duration) -> Self {
        Self {
            count: 1,
            visible_from: Some(delay),
            ..Self::default()
        }
    }

    /// A single element visible during `[from, until)`
    #[must_use]
    pub fn visible_between(from: Duration, until: Duration) -> Self {
        Self {
            count: 1,
            visible_from: Some(from),
            hidden_from: Some(until),
            ..Self::default()
        }
    }

    /// Set the number of matches
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set a single text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.texts = vec![text.into()];
        self.count = self.count.max(1);
        self
    }

    /// Set one text per match; the count follows
    #[must_use]
    pub fn with_texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts = texts.into_iter().map(Into::into).collect();
        self.count = self.texts.len();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Make this a `<select>` with these option labels
    #[must_use]
    pub fn with_options<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Make clicks fail
    #[must_use]
    pub fn with_click_error(mut self, message: impl Into<String>) -> Self {
        self.click_error = Some(message.into());
        self
    }

    /// State at `elapsed` since driver creation
    #[must_use]
    pub fn state_at(&self, elapsed: Duration) -> ElementState {
        let attached = self.count > 0;
        let shown = self.visible_from.is_some_and(|from| elapsed >= from)
            && self.hidden_from.map_or(true, |until| elapsed < until);
        ElementState {
            count: self.count,
            attached,
            visible: attached && shown,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    title: String,
    elements: HashMap<String, MockElement>,
    js_results: Vec<serde_json::Value>,
    cookies: Vec<CookieInfo>,
    navigation_latency: Duration,
    last_click: Option<ClickOptions>,
    call_history: Vec<String>,
}

/// Mock driver for unit testing.
///
/// Elements are keyed by the locator's display form, so a test registers the same
/// locator a page object builds.
#[derive(Debug)]
pub struct MockDriver {
    started: Instant,
    state: Mutex<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create new mock driver; the visibility clock starts now
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            state: Mutex::new(MockState {
                url: "about:blank".to_string(),
                ..MockState::default()
            }),
        }
    }

    /// Register an element
    #[must_use]
    pub fn with_element(self, locator: &Locator, element: MockElement) -> Self {
        self.set_element(locator, element);
        self
    }

    /// Register a cookie
    #[must_use]
    pub fn with_cookie(self, cookie: CookieInfo) -> Self {
        self.lock().cookies.push(cookie);
        self
    }

    /// Make every `goto` take this long
    #[must_use]
    pub fn with_navigation_latency(self, latency: Duration) -> Self {
        self.lock().navigation_latency = latency;
        self
    }

    /// Set the document title
    #[must_use]
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.lock().title = title.into();
        self
    }

    /// Register or replace an element
    pub fn set_element(&self, locator: &Locator, element: MockElement) {
        self.lock().elements.insert(locator.to_string(), element);
    }

    /// Remove an element
    pub fn remove_element(&self, locator: &Locator) {
        self.lock().elements.remove(&locator.to_string());
    }

    /// Queue a result for the next `evaluate`
    pub fn push_js_result(&self, result: serde_json::Value) {
        self.lock().js_results.push(result);
    }

    /// Current state of a registered element
    #[must_use]
    pub fn element(&self, locator: &Locator) -> Option<MockElement> {
        self.lock().elements.get(&locator.to_string()).cloned()
    }

    /// Options the last click was performed with
    #[must_use]
    pub fn last_click_options(&self) -> Option<ClickOptions> {
        self.lock().last_click.clone()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().call_history.clone()
    }

    /// Check if a call starting with `prefix` was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().call_history.iter().any(|c| c.starts_with(prefix))
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: String) {
        self.lock().call_history.push(call);
    }

    fn with_existing<T>(
        &self,
        action: &str,
        locator: &Locator,
        f: impl FnOnce(&mut MockElement) -> E2eResult<T>,
    ) -> E2eResult<T> {
        let key = locator.to_string();
        let mut state = self.lock();
        match state.elements.get_mut(&key) {
            Some(element) if element.count > 0 => f(element),
            _ => Err(E2eError::action(action, key, "no element matches")),
        }
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.record(format!("goto:{url}"));
        let latency = self.lock().navigation_latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.lock().url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.lock().url.clone())
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(self.lock().title.clone())
    }

    async fn element_state(&self, locator: &Locator) -> E2eResult<ElementState> {
        let elapsed = self.started.elapsed();
        Ok(self
            .lock()
            .elements
            .get(&locator.to_string())
            .map_or(ElementState::DETACHED, |e| e.state_at(elapsed)))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> E2eResult<()> {
        self.record(format!("scroll:{locator}"));
        self.with_existing("scroll", locator, |_| Ok(()))
    }

    async fn click(&self, locator: &Locator, options: &ClickOptions) -> E2eResult<()> {
        self.record(format!("click:{locator}"));
        self.lock().last_click = Some(options.clone());
        self.with_existing("click", locator, |element| match &element.click_error {
            Some(message) => Err(E2eError::action("click", locator.to_string(), message)),
            None => Ok(()),
        })
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.record(format!("fill:{locator}={value}"));
        self.with_existing("fill", locator, |element| {
            element.value = value.to_string();
            Ok(())
        })
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> E2eResult<()> {
        self.record(format!("check:{locator}={checked}"));
        self.with_existing("check", locator, |element| {
            element.checked = checked;
            Ok(())
        })
    }

    async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()> {
        self.record(format!("select:{locator}={label}"));
        self.with_existing("select", locator, |element| {
            if element.options.iter().any(|o| o == label) {
                element.selected = Some(label.to_string());
                Ok(())
            } else {
                Err(E2eError::OptionNotFound {
                    locator: locator.to_string(),
                    label: label.to_string(),
                })
            }
        })
    }

    async fn press_key(&self, key: &str) -> E2eResult<()> {
        self.record(format!("press:{key}"));
        Ok(())
    }

    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        Ok(self
            .lock()
            .elements
            .get(&locator.to_string())
            .map(|e| e.texts.clone())
            .unwrap_or_default())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        Ok(self
            .lock()
            .elements
            .get(&locator.to_string())
            .and_then(|e| e.attributes.get(name).cloned()))
    }

    async fn input_value(&self, locator: &Locator) -> E2eResult<String> {
        self.with_existing("input_value", locator, |element| Ok(element.value.clone()))
    }

    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
        self.record(format!("evaluate:{script}"));
        let mut state = self.lock();
        if state.js_results.is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            Ok(state.js_results.remove(0))
        }
    }

    async fn cookies(&self) -> E2eResult<Vec<CookieInfo>> {
        Ok(self.lock().cookies.clone())
    }

    async fn screenshot(&self) -> E2eResult<Screenshot> {
        self.record("screenshot".to_string());
        Ok(Screenshot::new(Vec::new()))
    }

    async fn close(&self) -> E2eResult<()> {
        self.record("close".to_string());
        Ok(())
    }
}
