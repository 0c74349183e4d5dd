//! Configuration records shared by the Quill session layer.
//!
//! The crate holds two unrelated kinds of settings. [`Configuration`] is the
//! caller-supplied, engine-wide payload that a session forwards to the
//! analysis engine; it is validated locally before it ever crosses the engine
//! boundary. [`LoggingConfig`] drives the tracing subscriber installed by the
//! host crate. Neither type knows how to load itself from disk: callers build
//! them directly or deserialise them from whatever payload they already hold.

mod configuration;
mod defaults;
mod logging;

pub use configuration::{
    Configuration, ConfigurationError, FilesConfiguration, FormatterConfiguration, IndentStyle,
    JavascriptConfiguration, JavascriptFormatter, LineEnding, LinterConfiguration, QuoteStyle,
    Rules, Semicolons,
};
pub use defaults::{
    DEFAULT_LOG_FILTER, MAX_INDENT_WIDTH, MAX_LINE_WIDTH, default_log_filter_string,
    default_log_format,
};
pub use logging::{LogFormat, LoggingConfig};
