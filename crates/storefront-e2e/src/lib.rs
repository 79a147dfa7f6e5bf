//! storefront-e2e: page objects and safe interactions for storefront UI tests
//!
//! End-to-end tests for a nopCommerce storefront: the target environment is
//! resolved from the process, page objects describe each page's elements,
//! and every action waits for its element before touching it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    storefront-e2e                                │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌──────────────┐           │
//! │   │ Page       │    │ Interac-   │    │ Driver       │           │
//! │   │ objects    │───►│ tions      │───►│ (CDP / mock) │           │
//! │   └────────────┘    └────────────┘    └──────────────┘           │
//! │         ▲                 ▲                                      │
//! │   ┌─────┴──────┐    ┌─────┴──────┐                               │
//! │   │ Live       │    │ RunConfig  │◄── TEST_ENV, BASE_URL, CI     │
//! │   │ suites     │    │ Environment│                               │
//! │   └────────────┘    └────────────┘                               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use storefront_e2e::pages::LoginPage;
//! use storefront_e2e::{PageObject, Session};
//!
//! # async fn demo() -> storefront_e2e::E2eResult<()> {
//! let session = Session::from_env().await?;
//! let login = LoginPage::new(session.ui());
//! login.open().await?;
//! login.login("user@example.com", "secret", false).await?;
//! session.close().await
//! # }
//! ```

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_frames))]

/// Auto-retrying assertions
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod assertion;

/// Chromium launch and the CDP driver
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
pub mod browser;

/// Run configuration derived from the environment
pub mod config;

/// Browser driver seam and the scripted mock
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod driver;

/// Named target environments and their resolution
pub mod environment;

/// Randomized test data
pub mod fixture;

/// Per-test browser sessions and log setup
#[allow(clippy::missing_errors_doc)]
pub mod harness;

/// Ordering, range and price helpers
pub mod helpers;

/// Safe interaction primitives
#[allow(clippy::missing_errors_doc)]
pub mod interaction;

/// Element locators
pub mod locator;

/// Page object trait
#[allow(clippy::missing_errors_doc)]
pub mod page_object;

/// Storefront page objects
#[warn(missing_docs)]
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod pages;

/// Error types
pub mod result;

/// Element state waits
#[allow(clippy::missing_errors_doc)]
pub mod wait;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test_support;

pub use assertion::{expect, expect_page, Expect, ExpectAssertion, PageExpect};
pub use browser::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::RunConfig;
pub use driver::{
    ClickOptions, CookieInfo, Driver, ElementState, MockDriver, MockElement, Modifier,
    MouseButton, Screenshot,
};
pub use environment::{
    resolve, resolve_base_url, EnvProvider, Environment, MapEnv, SystemEnv, Timeouts,
};
pub use fixture::{Address, DataGenerator, Gender, UserData};
pub use harness::{init_tracing, Session};
pub use interaction::{InteractionTimeouts, Interactions};
pub use locator::{Locator, Point, Selector};
pub use page_object::{PageObject, UrlMatcher};
pub use result::{E2eError, E2eResult};
pub use wait::{TwoPhaseWait, WaitState};
