//! Page Object Model support.
//!
//! A page object bundles the locators of one storefront page with the flows a
//! test performs on it. Instead of inheriting from a base page, every page
//! object holds the shared [`Interactions`] helper and the site [`Header`], and
//! implements [`PageObject`] for the common open/loaded behavior.

use crate::interaction::Interactions;
use crate::locator::Locator;
use crate::pages::header::Header;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for page objects representing one page of the storefront.
///
/// # Example
///
/// ```ignore
/// let login = LoginPage::new(&ui);
/// login.open().await?;
/// login.wait_until_loaded().await?;
/// login.login("user@example.com", "secret", false).await?;
/// assert!(login.header().is_user_logged_in().await?);
/// ```
#[async_trait]
pub trait PageObject: Send + Sync {
    /// URL pattern that matches this page (e.g., "/login", "/:category")
    fn url_pattern(&self) -> &str;

    /// Shared interaction helper
    fn ui(&self) -> &Interactions;

    /// Site header present on every page
    fn header(&self) -> &Header;

    /// Element whose visibility proves the page rendered
    fn ready_marker(&self) -> &Locator;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Navigate to this page; only patterns without wildcards or parameters can be opened
    async fn open(&self) -> E2eResult<()> {
        let path = UrlMatcher::new(self.url_pattern())
            .concrete_path()
            .ok_or_else(|| E2eError::Config {
                message: format!(
                    "{} cannot be opened directly: '{}' is not a fixed path",
                    self.page_name(),
                    self.url_pattern()
                ),
            })?;
        self.ui().navigate(&path).await
    }

    /// Wait for the ready marker (visible, then attached)
    async fn wait_until_loaded(&self) -> E2eResult<()> {
        self.ui().wait_for_element(self.ready_marker(), None).await
    }

    /// Whether the ready marker is visible right now
    async fn is_loaded(&self) -> E2eResult<bool> {
        self.ui().is_visible(self.ready_marker()).await
    }

    /// Whether the current URL matches this page's pattern
    async fn is_current(&self) -> E2eResult<bool> {
        let url = self.ui().current_url().await?;
        Ok(UrlMatcher::new(self.url_pattern()).matches_url(&url))
    }
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/login`
    /// - Wildcards: `/*`
    /// - Named parameters: `/:category`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_ascii_lowercase())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a path matches the pattern (literal segments compare case-insensitively)
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path_segments: Vec<&str> = split_path(path).collect();
        path_segments.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(&path_segments)
                .all(|(segment, actual)| match segment {
                    UrlSegment::Literal(lit) => lit.eq_ignore_ascii_case(actual),
                    UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
                })
    }

    /// Check a full URL, ignoring scheme, host, query and fragment
    #[must_use]
    pub fn matches_url(&self, url: &str) -> bool {
        self.matches(path_of(url))
    }

    /// Extract parameters from a path
    #[must_use]
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        self.segments
            .iter()
            .zip(split_path(path))
            .filter_map(|(segment, value)| match segment {
                UrlSegment::Parameter(name) => Some((name.clone(), value.to_string())),
                _ => None,
            })
            .collect()
    }

    /// The path to load when the pattern has no wildcards or parameters
    #[must_use]
    pub fn concrete_path(&self) -> Option<String> {
        let literals: Option<Vec<&str>> = self
            .segments
            .iter()
            .map(|segment| match segment {
                UrlSegment::Literal(lit) => Some(lit.as_str()),
                _ => None,
            })
            .collect();
        literals.map(|parts| format!("/{}", parts.join("/")))
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Path component of a URL (`/` when empty)
fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = if url.contains("://") {
        without_scheme.find('/').map_or("", |i| &without_scheme[i..])
    } else {
        without_scheme
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    match &path[..end] {
        "" => "/",
        p => p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match() {
            let matcher = UrlMatcher::new("/login");
            assert!(matcher.matches("/login"));
            assert!(matcher.matches("/Login/"));
            assert!(!matcher.matches("/register"));
            assert!(!matcher.matches("/login/extra"));
        }

        #[test]
        fn test_root_matches_root_only() {
            let matcher = UrlMatcher::new("/");
            assert!(matcher.matches("/"));
            assert!(matcher.matches(""));
            assert!(!matcher.matches("/books"));
        }

        #[test]
        fn test_parameter_match_and_extract() {
            let matcher = UrlMatcher::new("/:category");
            assert!(matcher.matches("/computers"));
            assert!(!matcher.matches("/computers/desktops"));
            assert_eq!(
                matcher.extract_params("/jewelry").get("category").map(String::as_str),
                Some("jewelry")
            );
        }

        #[test]
        fn test_full_url() {
            let matcher = UrlMatcher::new("/search");
            assert!(matcher.matches_url("https://demo.nopcommerce.com/search?q=laptop"));
            assert!(matcher.matches_url("https://demo.nopcommerce.com/search#top"));
            assert!(!matcher.matches_url("https://demo.nopcommerce.com/"));
            assert!(UrlMatcher::new("/").matches_url("https://demo.nopcommerce.com"));
        }

        #[test]
        fn test_concrete_path() {
            assert_eq!(
                UrlMatcher::new("/passwordrecovery").concrete_path().as_deref(),
                Some("/passwordrecovery")
            );
            assert_eq!(UrlMatcher::new("/").concrete_path().as_deref(), Some("/"));
            assert_eq!(UrlMatcher::new("/:category").concrete_path(), None);
            assert_eq!(UrlMatcher::new("/*").concrete_path(), None);
        }

        #[test]
        fn test_pattern_getter() {
            assert_eq!(UrlMatcher::new("/register").pattern(), "/register");
        }
    }

    mod path_tests {
        use super::*;

        #[test]
        fn test_path_of() {
            assert_eq!(path_of("https://a.com/x/y?z=1"), "/x/y");
            assert_eq!(path_of("https://a.com"), "/");
            assert_eq!(path_of("/login#f"), "/login");
            assert_eq!(path_of("about:blank"), "about:blank");
        }
    }
}
