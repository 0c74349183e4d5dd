//! Default values and limits shared by the configuration records.

/// Default log filter expression used by the session layer.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Widest line the formatter accepts.
pub const MAX_LINE_WIDTH: u16 = 320;

/// Widest indentation the formatter accepts.
pub const MAX_INDENT_WIDTH: u8 = 24;

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}
