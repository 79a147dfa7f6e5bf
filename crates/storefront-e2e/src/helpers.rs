//! Small checks and conversions used by the suites: ordering, ranges, prices.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::cmp::Ordering;

/// Default length of [`random_string`]
pub const DEFAULT_RANDOM_STRING_LEN: usize = 10;

/// Random alphanumeric string of `len` characters
#[must_use]
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// No element is greater than its successor.
///
/// Incomparable pairs (NaN prices) do not break the order.
#[must_use]
pub fn is_sorted_ascending<T: PartialOrd>(values: &[T]) -> bool {
    values
        .windows(2)
        .all(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Greater))
}

/// No element is less than its successor
#[must_use]
pub fn is_sorted_descending<T: PartialOrd>(values: &[T]) -> bool {
    values
        .windows(2)
        .all(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less))
}

/// `min <= value <= max`
#[must_use]
pub fn is_within_range(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// Parse a rendered price such as `"$1,200.00"`.
///
/// Everything except digits and dots is dropped, then the longest numeric
/// prefix is parsed; `None` when no digits remain.
#[must_use]
pub fn extract_price(text: &str) -> Option<f64> {
    let mut seen_dot = false;
    let prefix: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();
    prefix.trim_end_matches('.').parse().ok()
}

/// Dollar amount with two decimals, e.g. `$12.50`
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}
