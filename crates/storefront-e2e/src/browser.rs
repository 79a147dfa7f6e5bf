//! Browser control over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature, [`Browser`] launches Chromium through
//! chromiumoxide and hands out one isolated browser context per test as a
//! [`Driver`]. Without the feature the same API exists but launching fails
//! with [`E2eError::BrowserLaunchError`], so callers compile either way and
//! unit tests run on [`crate::MockDriver`].

use crate::config::{RunConfig, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::driver::Driver;
use crate::result::{E2eError, E2eResult};
use std::sync::Arc;

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            chromium_path: None,
            user_agent: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Launch settings of a resolved run
    #[must_use]
    pub fn from_run_config(config: &RunConfig) -> Self {
        Self {
            headless: config.headless,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            chromium_path: config.chromium_path.clone(),
            user_agent: None,
            sandbox: config.sandbox,
        }
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// JavaScript run in the page by the CDP driver.
///
/// Every script resolves the locator chain in the page and returns a JSON
/// object, never `undefined`, so results always deserialize.
pub mod script {
    use crate::locator::{js_string, Locator};

    /// `{count, attached, visible}` of the locator
    #[must_use]
    pub fn element_state(locator: &Locator) -> String {
        format!(
            "(() => {{ const els = {}; const el = els[0]; \
             let visible = false; \
             if (el && el.isConnected) {{ \
             const style = window.getComputedStyle(el); \
             const rect = el.getBoundingClientRect(); \
             visible = style.visibility !== 'hidden' && style.display !== 'none' \
             && rect.width > 0 && rect.height > 0; }} \
             return {{ count: els.length, attached: els.length > 0, visible }}; }})()",
            locator.to_js()
        )
    }

    /// Run `body` with `el` bound to the first match.
    ///
    /// Yields `{found: false}` without a match, else `{found: true, value}`.
    #[must_use]
    pub fn on_first(locator: &Locator, body: &str) -> String {
        format!(
            "(() => {{ const el = {}[0]; if (!el) return {{ found: false }}; \
             const value = (() => {{ {body} }})(); \
             return {{ found: true, value: value === undefined ? null : value }}; }})()",
            locator.to_js()
        )
    }

    /// Text content of every match
    #[must_use]
    pub fn text_contents(locator: &Locator) -> String {
        format!(
            "(() => {} .map(el => el.textContent || ''))()",
            locator.to_js()
        )
    }

    /// Bounding box of the first match after scrolling it into view
    #[must_use]
    pub fn bounding_box(locator: &Locator) -> String {
        on_first(
            locator,
            "el.scrollIntoView({ block: 'center', inline: 'center' }); \
             const r = el.getBoundingClientRect(); \
             return { x: r.left, y: r.top, width: r.width, height: r.height };",
        )
    }

    /// Replace an input value the way typing would, firing input and change
    #[must_use]
    pub fn fill(locator: &Locator, value: &str) -> String {
        on_first(
            locator,
            &format!(
                "el.focus(); el.value = {}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return el.value;",
                js_string(value)
            ),
        )
    }

    /// Click the box when its checked state differs; returns the final state
    #[must_use]
    pub fn set_checked(locator: &Locator, checked: bool) -> String {
        on_first(
            locator,
            &format!("if (el.checked !== {checked}) {{ el.click(); }} return el.checked;"),
        )
    }

    /// Select the option whose trimmed label equals `label`; returns whether one did
    #[must_use]
    pub fn select_option(locator: &Locator, label: &str) -> String {
        on_first(
            locator,
            &format!(
                "const wanted = {}; \
                 const option = Array.from(el.options || []) \
                 .find(o => (o.label || o.textContent || '').trim() === wanted); \
                 if (!option) return false; \
                 el.focus(); el.value = option.value; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true;",
                js_string(label.trim())
            ),
        )
    }

    /// Attribute of the first match (`null` when absent)
    #[must_use]
    pub fn attribute(locator: &Locator, name: &str) -> String {
        on_first(locator, &format!("return el.getAttribute({});", js_string(name)))
    }

    /// Value of the first matching input
    #[must_use]
    pub fn input_value(locator: &Locator) -> String {
        on_first(locator, "return el.value === undefined ? '' : String(el.value);")
    }
}

/// Key event fields for a key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    /// `KeyboardEvent.key`
    pub key: String,
    /// `KeyboardEvent.code`
    pub code: String,
    /// Windows virtual key code
    pub key_code: i64,
    /// Text inserted by the key, if any
    pub text: Option<String>,
}

/// Resolve a key name (`"Enter"`, `"Tab"`, `"a"`, ...) to event fields
#[must_use]
pub fn key_definition(key: &str) -> KeyDefinition {
    let named = |code: i64, text: Option<&str>| KeyDefinition {
        key: key.to_string(),
        code: key.to_string(),
        key_code: code,
        text: text.map(str::to_string),
    };
    match key {
        "Enter" => named(13, Some("\r")),
        "Tab" => named(9, None),
        "Escape" => named(27, None),
        "Backspace" => named(8, None),
        "ArrowLeft" => named(37, None),
        "ArrowUp" => named(38, None),
        "ArrowRight" => named(39, None),
        "ArrowDown" => named(40, None),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => {
                    let upper = c.to_ascii_uppercase();
                    KeyDefinition {
                        key: key.to_string(),
                        code: if c.is_ascii_digit() {
                            format!("Digit{c}")
                        } else {
                            format!("Key{upper}")
                        },
                        key_code: i64::from(u32::from(upper)),
                        text: Some(key.to_string()),
                    }
                }
                (Some(_), None) => KeyDefinition {
                    key: key.to_string(),
                    code: String::new(),
                    key_code: 0,
                    text: Some(key.to_string()),
                },
                _ => named(0, None),
            }
        }
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::items_after_statements)]
mod cdp {
    use super::{is_context_swap, key_definition, script, BrowserConfig};
    use crate::driver::{ClickOptions, CookieInfo, Driver, ElementState, MouseButton, Screenshot};
    use crate::locator::Locator;
    use crate::result::{E2eError, E2eResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
        DispatchMouseEventType, MouseButton as CdpMouseButton,
    };
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::cdp::browser_protocol::target::{
        CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Browser instance with real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance with real CDP
        pub async fn launch(config: BrowserConfig) -> E2eResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            if let Some(ref ua) = config.user_agent {
                builder = builder.arg(format!("--user-agent={ua}"));
            }

            let cdp_config = builder
                .build()
                .map_err(|message| E2eError::BrowserLaunchError { message })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                E2eError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        tracing::debug!("CDP handler loop ended");
                        break;
                    }
                }
            });

            tracing::info!(
                headless = config.headless,
                width = config.viewport_width,
                height = config.viewport_height,
                "browser launched"
            );

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Open a fresh browser context (own cookies and storage) with one page
        pub async fn new_context(&self) -> E2eResult<Arc<dyn Driver>> {
            let browser = self.inner.lock().await;
            let context_id = browser
                .execute(CreateBrowserContextParams::default())
                .await
                .map_err(page_error)?
                .result
                .browser_context_id;

            let target = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(context_id.clone())
                .build()
                .map_err(|message| E2eError::PageError { message })?;
            let page = browser.new_page(target).await.map_err(page_error)?;

            let metrics = SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(self.config.viewport_width))
                .height(i64::from(self.config.viewport_height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(|message| E2eError::PageError { message })?;
            page.execute(metrics).await.map_err(page_error)?;

            tracing::debug!(context = ?context_id, "browser context opened");
            Ok(Arc::new(ChromiumDriver {
                page,
                context_id,
                browser: Arc::clone(&self.inner),
            }))
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> E2eResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| E2eError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            drop(browser);
            self.handle.abort();
            Ok(())
        }
    }

    fn page_error(e: impl ToString) -> E2eError {
        E2eError::PageError {
            message: e.to_string(),
        }
    }

    #[derive(Debug, Deserialize)]
    #[serde(bound = "T: DeserializeOwned")]
    struct OnFirst<T> {
        found: bool,
        #[serde(default)]
        value: Option<T>,
    }

    #[derive(Debug, Clone, Copy, Deserialize)]
    struct BoundingBox {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    }

    /// One browser context driven over CDP
    #[derive(Debug)]
    pub struct ChromiumDriver {
        page: CdpPage,
        context_id: BrowserContextId,
        browser: Arc<Mutex<CdpBrowser>>,
    }

    impl ChromiumDriver {
        async fn eval<T: DeserializeOwned>(&self, js: &str) -> E2eResult<T> {
            let result = self.page.evaluate(js).await.map_err(E2eError::script)?;
            let value = result.value().cloned().unwrap_or(serde_json::Value::Null);
            Ok(serde_json::from_value(value)?)
        }

        /// Evaluate an [`script::on_first`] script, failing when nothing matches
        async fn on_first<T: DeserializeOwned>(
            &self,
            action: &str,
            locator: &Locator,
            js: &str,
        ) -> E2eResult<Option<T>> {
            let reply: OnFirst<T> = self.eval(js).await?;
            if reply.found {
                Ok(reply.value)
            } else {
                Err(E2eError::action(action, locator.to_string(), "no element matches"))
            }
        }

        async fn mouse(
            &self,
            kind: DispatchMouseEventType,
            x: f64,
            y: f64,
            options: &ClickOptions,
        ) -> E2eResult<()> {
            let button = match options.button {
                MouseButton::Left => CdpMouseButton::Left,
                MouseButton::Right => CdpMouseButton::Right,
                MouseButton::Middle => CdpMouseButton::Middle,
            };
            let params = DispatchMouseEventParams::builder()
                .r#type(kind)
                .x(x)
                .y(y)
                .button(button)
                .click_count(i64::from(options.click_count))
                .modifiers(options.modifier_mask())
                .build()
                .map_err(|message| E2eError::action("click", "mouse", message))?;
            self.page.execute(params).await.map_err(page_error)?;
            Ok(())
        }
    }

    #[async_trait]
    impl Driver for ChromiumDriver {
        async fn goto(&self, url: &str) -> E2eResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| E2eError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> E2eResult<String> {
            Ok(self.page.url().await.map_err(page_error)?.unwrap_or_default())
        }

        async fn title(&self) -> E2eResult<String> {
            Ok(self
                .page
                .get_title()
                .await
                .map_err(page_error)?
                .unwrap_or_default())
        }

        async fn element_state(&self, locator: &Locator) -> E2eResult<ElementState> {
            match self.eval(&script::element_state(locator)).await {
                Ok(state) => Ok(state),
                Err(e) if is_context_swap(&e) => {
                    tracing::debug!(%locator, error = %e, "document swapped mid-query, treating as detached");
                    Ok(ElementState::DETACHED)
                }
                Err(e) => Err(e),
            }
        }

        async fn scroll_into_view(&self, locator: &Locator) -> E2eResult<()> {
            self.on_first::<BoundingBox>("scroll", locator, &script::bounding_box(locator))
                .await?;
            Ok(())
        }

        async fn click(&self, locator: &Locator, options: &ClickOptions) -> E2eResult<()> {
            let rect = self
                .on_first::<BoundingBox>("click", locator, &script::bounding_box(locator))
                .await?
                .ok_or_else(|| E2eError::action("click", locator.to_string(), "no bounding box"))?;
            let (x, y) = options.position.map_or(
                (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0),
                |p| (rect.x + p.x, rect.y + p.y),
            );
            if options.trial {
                return Ok(());
            }

            self.mouse(DispatchMouseEventType::MouseMoved, x, y, options).await?;
            self.mouse(DispatchMouseEventType::MousePressed, x, y, options).await?;
            if let Some(delay) = options.delay {
                tokio::time::sleep(delay).await;
            }
            self.mouse(DispatchMouseEventType::MouseReleased, x, y, options).await
        }

        async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
            self.on_first::<String>("fill", locator, &script::fill(locator, value))
                .await?;
            Ok(())
        }

        async fn set_checked(&self, locator: &Locator, checked: bool) -> E2eResult<()> {
            let now = self
                .on_first::<bool>("check", locator, &script::set_checked(locator, checked))
                .await?;
            if now == Some(checked) {
                Ok(())
            } else {
                Err(E2eError::action(
                    "check",
                    locator.to_string(),
                    format!("state did not change to {checked}"),
                ))
            }
        }

        async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()> {
            let selected = self
                .on_first::<bool>("select", locator, &script::select_option(locator, label))
                .await?;
            if selected == Some(true) {
                Ok(())
            } else {
                Err(E2eError::OptionNotFound {
                    locator: locator.to_string(),
                    label: label.to_string(),
                })
            }
        }

        async fn press_key(&self, key: &str) -> E2eResult<()> {
            let def = key_definition(key);
            for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
                let is_down = kind == DispatchKeyEventType::KeyDown;
                let mut builder = DispatchKeyEventParams::builder()
                    .r#type(kind)
                    .key(def.key.clone())
                    .code(def.code.clone())
                    .windows_virtual_key_code(def.key_code);
                if let (true, Some(text)) = (is_down, def.text.as_ref()) {
                    builder = builder.text(text.clone());
                }
                let params = builder
                    .build()
                    .map_err(|message| E2eError::action("press", key, message))?;
                self.page.execute(params).await.map_err(page_error)?;
            }
            Ok(())
        }

        async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
            self.eval(&script::text_contents(locator)).await
        }

        async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
            self.on_first("attribute", locator, &script::attribute(locator, name))
                .await
        }

        async fn input_value(&self, locator: &Locator) -> E2eResult<String> {
            Ok(self
                .on_first::<String>("input_value", locator, &script::input_value(locator))
                .await?
                .unwrap_or_default())
        }

        async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
            self.eval(script).await
        }

        async fn cookies(&self) -> E2eResult<Vec<CookieInfo>> {
            let cookies = self.page.get_cookies().await.map_err(page_error)?;
            Ok(cookies
                .into_iter()
                .map(|c| CookieInfo {
                    name: c.name,
                    value: c.value,
                    domain: c.domain,
                    path: c.path,
                    expires: (!c.session).then_some(c.expires),
                    http_only: c.http_only,
                    secure: c.secure,
                })
                .collect())
        }

        async fn screenshot(&self) -> E2eResult<Screenshot> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot = self.page.execute(params).await.map_err(page_error)?;

            use base64::Engine;
            let data = base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(page_error)?;
            Ok(Screenshot::new(data))
        }

        async fn close(&self) -> E2eResult<()> {
            self.page.clone().close().await.map_err(page_error)?;
            let browser = self.browser.lock().await;
            browser
                .execute(DisposeBrowserContextParams::new(self.context_id.clone()))
                .await
                .map_err(page_error)?;
            tracing::debug!(context = ?self.context_id, "browser context closed");
            Ok(())
        }
    }
}

// ============================================================================
// Stub Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
mod stub {
    use super::{not_enabled, BrowserConfig};
    use crate::driver::Driver;
    use crate::result::E2eResult;
    use std::sync::Arc;

    /// Browser handle; cannot be launched without the `browser` feature
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Always fails: no CDP support compiled in
        pub async fn launch(config: BrowserConfig) -> E2eResult<Self> {
            tracing::debug!(?config, "browser launch requested without CDP support");
            Err(not_enabled())
        }

        /// Always fails: no CDP support compiled in
        pub async fn new_context(&self) -> E2eResult<Arc<dyn Driver>> {
            Err(not_enabled())
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Nothing to close
        pub async fn close(self) -> E2eResult<()> {
            Ok(())
        }
    }
}

/// Evaluation errors raised while a navigation replaces the document.
///
/// Only these mean "no element yet"; anything else (closed target, bad
/// selector, undecodable reply) is a real failure.
const CONTEXT_SWAP_ERRORS: [&str; 2] = [
    "Execution context was destroyed",
    "Cannot find context with specified id",
];

#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn is_context_swap(error: &E2eError) -> bool {
    match error {
        E2eError::ScriptError { message } => {
            CONTEXT_SWAP_ERRORS.iter().any(|m| message.contains(m))
        }
        _ => false,
    }
}

#[cfg_attr(feature = "browser", allow(dead_code))]
fn not_enabled() -> E2eError {
    E2eError::BrowserLaunchError {
        message: "Browser feature not enabled. Enable 'browser' feature for real CDP support."
            .to_string(),
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, ChromiumDriver};

#[cfg(not(feature = "browser"))]
pub use stub::Browser;

/// Launch a browser and open one context, returning both
pub async fn launch_context(config: BrowserConfig) -> E2eResult<(Browser, Arc<dyn Driver>)> {
    let browser = Browser::launch(config).await?;
    let driver = browser.new_context().await?;
    Ok((browser, driver))
}
