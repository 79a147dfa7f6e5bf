//! Command handlers

pub mod config;
pub mod env;
pub mod smoke;

use console::style;

/// `label` padded to a column, bold when colored
pub(crate) fn label(text: &str, use_color: bool) -> String {
    let padded = format!("{text:<14}");
    if use_color {
        style(padded).bold().to_string()
    } else {
        padded
    }
}
