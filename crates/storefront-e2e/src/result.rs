//! Result and error types for storefront end-to-end tests.

use thiserror::Error;

/// Result type for storefront-e2e operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can surface from the page layer
#[derive(Debug, Error)]
pub enum E2eError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page or browsing-context error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait condition was not met within its budget
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// What was being waited for
        waited_for: String,
    },

    /// A strict locator matched more than one element
    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation {
        /// Locator description
        locator: String,
        /// Number of matching elements
        count: usize,
    },

    /// A `<select>` had no option with the requested label
    #[error("No option labelled '{label}' in {locator}")]
    OptionNotFound {
        /// Locator description
        locator: String,
        /// Requested option label
        label: String,
    },

    /// The driver failed to perform an action (element detached mid-action etc.)
    #[error("Action '{action}' on {locator} failed: {message}")]
    ActionError {
        /// Action name
        action: String,
        /// Locator description
        locator: String,
        /// Error message
        message: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    ScriptError {
        /// Error message
        message: String,
    },

    /// Assertion error (from `expect()`)
    #[error("Assertion error: {message}")]
    AssertionError {
        /// Error message
        message: String,
    },

    /// Category name with no menu entry (strict lookups only)
    #[error("Unknown category: {name}")]
    UnknownCategory {
        /// Requested name
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl E2eError {
    /// Create a timeout error
    #[must_use]
    pub fn timeout(ms: u64, waited_for: impl Into<String>) -> Self {
        Self::Timeout {
            ms,
            waited_for: waited_for.into(),
        }
    }

    /// Create an action error
    #[must_use]
    pub fn action(
        action: impl Into<String>,
        locator: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Self::ActionError {
            action: action.into(),
            locator: locator.into(),
            message: message.to_string(),
        }
    }

    /// Create a script error
    #[must_use]
    pub fn script(message: impl ToString) -> Self {
        Self::ScriptError {
            message: message.to_string(),
        }
    }

    /// Create an assertion error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionError {
            message: message.into(),
        }
    }

    /// Whether this is a wait timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
