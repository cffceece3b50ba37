pub mod cdn;
pub mod completions;
pub mod exists;
pub mod install;
pub mod list;
pub mod resolve;

use console::Style;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Parse a `NAME=VALUE` argument.
pub fn parse_pair(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() && !value.is_empty() => {
            Ok((name.to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{arg}'")),
    }
}

pub fn emitted(text: &str) -> String {
    Style::new().green().apply_to(text).to_string()
}

pub fn skipped(text: &str) -> String {
    Style::new().dim().apply_to(text).to_string()
}

pub fn warning(text: &str) -> String {
    Style::new().yellow().apply_to(text).to_string()
}
