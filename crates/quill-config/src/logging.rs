use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::{default_log_filter_string, default_log_format};

/// Supported logging output formats.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    #[default]
    Json,
    /// Human-readable single line output.
    Compact,
}

/// Settings for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string, for example `quill_host=debug`.
    #[serde(default = "default_log_filter_string")]
    pub filter: String,
    /// Output format of emitted events.
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Filter expression handed to the subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.filter.as_str()
    }

    /// Output format handed to the subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.format
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter_string(),
            format: default_log_format(),
        }
    }
}
