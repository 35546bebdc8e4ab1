//! Default values applied when a run document leaves a field out.
//!
//! # Design
//! - Keep every default in one place so the loader, validator, and CLI agree.

/// Output name pattern used when a template does not provide one.
pub const DEFAULT_OUTPUT_FILE_NAME_PATTERN: &str = "@{filterBaseName}.@{sourceExtension}";
/// Indicator that introduces placeholders inside template content.
pub const DEFAULT_CONTENT_INDICATOR: char = '$';
/// Indicator that introduces placeholders inside output name patterns.
pub const DEFAULT_NAME_INDICATOR: char = '@';
/// Run document looked up when the CLI is not given one.
pub const DEFAULT_CONFIG_FILE: &str = "tessera.yaml";

pub(crate) fn output_file_name_pattern() -> String {
    DEFAULT_OUTPUT_FILE_NAME_PATTERN.to_string()
}

pub(crate) const fn content_indicator() -> char {
    DEFAULT_CONTENT_INDICATOR
}

pub(crate) const fn name_indicator() -> char {
    DEFAULT_NAME_INDICATOR
}

pub(crate) const fn enabled() -> bool {
    true
}
