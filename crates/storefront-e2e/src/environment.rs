//! Target environment resolution.
//!
//! The environment table is a process-wide constant. Resolution picks one record
//! from an explicit name, the `TEST_ENV` variable, or the `demo` default, in that
//! order, and never fails: an unknown name logs a warning and falls back to `demo`.

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Variable selecting the environment by name
pub const TEST_ENV_VAR: &str = "TEST_ENV";

/// Variable overriding the resolved base URL
pub const BASE_URL_VAR: &str = "BASE_URL";

/// Key of the fallback environment
pub const DEFAULT_ENVIRONMENT: &str = "demo";

/// Timeout budget of an environment, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timeouts {
    /// General-purpose default
    pub default: u64,
    /// Page navigation budget
    pub navigation: u64,
    /// Per-action budget (clicks, fills, un-timed waits)
    pub action: u64,
}

impl Timeouts {
    /// Default timeout as Duration
    #[must_use]
    pub const fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default)
    }

    /// Navigation timeout as Duration
    #[must_use]
    pub const fn navigation_duration(&self) -> Duration {
        Duration::from_millis(self.navigation)
    }

    /// Action timeout as Duration
    #[must_use]
    pub const fn action_duration(&self) -> Duration {
        Duration::from_millis(self.action)
    }
}

/// A named target deployment of the storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    /// Lowercase lookup key
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    /// Storefront base URL
    pub base_url: &'static str,
    /// Optional API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<&'static str>,
    /// Timeout budget
    pub timeout: Timeouts,
}

static ENVIRONMENTS: [Environment; 4] = [
    Environment {
        key: "demo",
        name: "Demo",
        base_url: "https://demo.nopcommerce.com",
        api_url: None,
        timeout: Timeouts {
            default: 30_000,
            navigation: 30_000,
            action: 15_000,
        },
    },
    Environment {
        key: "test",
        name: "Test",
        base_url: "https://test.nopcommerce.com",
        api_url: None,
        timeout: Timeouts {
            default: 30_000,
            navigation: 30_000,
            action: 15_000,
        },
    },
    Environment {
        key: "staging",
        name: "Staging",
        base_url: "https://staging.nopcommerce.com",
        api_url: None,
        timeout: Timeouts {
            default: 45_000,
            navigation: 45_000,
            action: 20_000,
        },
    },
    Environment {
        key: "production",
        name: "Production",
        base_url: "https://www.nopcommerce.com",
        api_url: None,
        timeout: Timeouts {
            default: 60_000,
            navigation: 60_000,
            action: 30_000,
        },
    },
];

/// All configured environments, in table order
#[must_use]
pub fn environments() -> &'static [Environment] {
    &ENVIRONMENTS
}

/// The fallback environment
#[must_use]
pub fn default_environment() -> &'static Environment {
    &ENVIRONMENTS[0]
}

/// Case-insensitive lookup without fallback
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Environment> {
    ENVIRONMENTS
        .iter()
        .find(|env| env.key.eq_ignore_ascii_case(name))
}

/// Resolve an environment from an explicit name and the `TEST_ENV` value.
///
/// Empty strings count as absent. Unknown names fall back to `demo` with a warning.
#[must_use]
pub fn resolve(name_override: Option<&str>, env_var: Option<&str>) -> &'static Environment {
    let requested = non_empty(name_override)
        .or_else(|| non_empty(env_var))
        .unwrap_or(DEFAULT_ENVIRONMENT);

    lookup(requested).unwrap_or_else(|| {
        tracing::warn!(
            requested,
            fallback = DEFAULT_ENVIRONMENT,
            "Environment '{requested}' not found. Falling back to '{DEFAULT_ENVIRONMENT}'."
        );
        default_environment()
    })
}

/// Base URL for an environment, honoring an explicit override
#[must_use]
pub fn resolve_base_url(base_url_override: Option<&str>, environment: &Environment) -> String {
    non_empty(base_url_override)
        .unwrap_or(environment.base_url)
        .to_string()
}

/// Resolve the environment reading `TEST_ENV` from `provider`
#[must_use]
pub fn resolve_from_env(
    provider: &impl EnvProvider,
    name_override: Option<&str>,
) -> &'static Environment {
    let env_var = provider.var(TEST_ENV_VAR);
    resolve(name_override, env_var.as_deref())
}

/// Resolve the base URL reading `BASE_URL` and `TEST_ENV` from `provider`
#[must_use]
pub fn base_url_from_env(provider: &impl EnvProvider, name_override: Option<&str>) -> String {
    let environment = resolve_from_env(provider, name_override);
    let base_url = provider.var(BASE_URL_VAR);
    resolve_base_url(base_url.as_deref(), environment)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// ENVIRONMENT PROVIDERS
// =============================================================================

/// Access to process-level variables (injectable for testing)
pub trait EnvProvider {
    /// Get a variable's value
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvProvider for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;

    mod table_tests {
        use super::*;

        #[test]
        fn test_four_environments() {
            let keys: Vec<_> = environments().iter().map(|e| e.key).collect();
            assert_eq!(keys, vec!["demo", "test", "staging", "production"]);
        }

        #[test]
        fn test_keys_are_lowercase() {
            for env in environments() {
                assert_eq!(env.key, env.key.to_lowercase());
            }
        }

        #[test]
        fn test_default_is_demo() {
            assert_eq!(default_environment().key, "demo");
            assert_eq!(default_environment().base_url, "https://demo.nopcommerce.com");
        }

        #[test]
        fn test_production_timeouts() {
            let prod = lookup("production").unwrap();
            assert_eq!(prod.timeout.default, 60_000);
            assert_eq!(prod.timeout.action_duration(), Duration::from_secs(30));
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_uppercase_staging() {
            let env = resolve(Some("STAGING"), None);
            assert_eq!(env.key, "staging");
            assert_eq!(env.timeout.navigation, 45_000);
        }

        #[test]
        fn test_explicit_beats_variable() {
            assert_eq!(resolve(Some("test"), Some("production")).key, "test");
        }

        #[test]
        fn test_variable_beats_default() {
            assert_eq!(resolve(None, Some("Production")).key, "production");
        }

        #[test]
        fn test_default_when_nothing_given() {
            assert_eq!(resolve(None, None).key, "demo");
        }

        #[test]
        fn test_empty_strings_fall_through() {
            assert_eq!(resolve(Some(""), Some("staging")).key, "staging");
            assert_eq!(resolve(Some(""), Some("")).key, "demo");
        }

        #[test]
        fn test_unknown_falls_back_with_warning() {
            let (env, logs) = capture_logs(|| resolve(Some("bogus"), None));
            assert_eq!(env.key, "demo");
            assert!(logs.contains("WARN"));
            assert!(logs.contains("bogus"));
        }

        #[test]
        fn test_unknown_variable_falls_back() {
            let (env, logs) = capture_logs(|| resolve(None, Some("qa-42")));
            assert_eq!(env.key, "demo");
            assert!(logs.contains("qa-42"));
        }

        #[test]
        fn test_known_name_logs_nothing() {
            let (_, logs) = capture_logs(|| resolve(Some("test"), None));
            assert!(logs.is_empty());
        }
    }

    mod base_url_tests {
        use super::*;

        #[test]
        fn test_override_wins() {
            let staging = lookup("staging").unwrap();
            assert_eq!(
                resolve_base_url(Some("http://localhost:5000"), staging),
                "http://localhost:5000"
            );
        }

        #[test]
        fn test_environment_url_without_override() {
            let staging = lookup("staging").unwrap();
            assert_eq!(
                resolve_base_url(None, staging),
                "https://staging.nopcommerce.com"
            );
            assert_eq!(
                resolve_base_url(Some(""), staging),
                "https://staging.nopcommerce.com"
            );
        }

        #[test]
        fn test_from_provider() {
            let env = MapEnv::new().with_var(TEST_ENV_VAR, "test");
            assert_eq!(base_url_from_env(&env, None), "https://test.nopcommerce.com");

            let env = env.with_var(BASE_URL_VAR, "http://127.0.0.1:8080");
            assert_eq!(base_url_from_env(&env, None), "http://127.0.0.1:8080");
        }

        #[test]
        fn test_override_regardless_of_environment() {
            let env = MapEnv::new()
                .with_var(TEST_ENV_VAR, "nonsense")
                .with_var(BASE_URL_VAR, "http://shop.local");
            assert_eq!(base_url_from_env(&env, Some("production")), "http://shop.local");
        }
    }

    mod provider_tests {
        use super::*;

        #[test]
        fn test_map_env_reads_back() {
            let env = MapEnv::new().with_var("A", "1");
            assert_eq!(env.var("A").as_deref(), Some("1"));
            assert!(env.var("B").is_none());
        }

        #[test]
        fn test_resolve_from_env_uses_test_env() {
            let env = MapEnv::new().with_var(TEST_ENV_VAR, "Staging");
            assert_eq!(resolve_from_env(&env, None).key, "staging");
            assert_eq!(resolve_from_env(&env, Some("demo")).key, "demo");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_case_insensitive(idx in 0usize..4, mask in proptest::collection::vec(any::<bool>(), 10)) {
                let env = &environments()[idx];
                let mixed: String = env
                    .key
                    .chars()
                    .zip(mask.iter().cycle())
                    .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
                    .collect();
                prop_assert_eq!(resolve(Some(&mixed), None), env);
            }

            #[test]
            fn prop_resolution_is_total(name in "\\PC{0,16}") {
                let env = resolve(Some(&name), None);
                prop_assert!(environments().contains(env));
            }
        }
    }
}
