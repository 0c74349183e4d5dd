//! Session layer in front of a stateful source-analysis engine.
//!
//! The engine requires files to be opened before analysis and closed
//! afterwards. This crate turns one-shot requests ("format this content",
//! "lint this content", "print these diagnostics") into the right sequence of
//! engine calls, guarantees that every registration it opens is closed and
//! every printer it creates is released, and reports engine failures through
//! a single [`SessionError`] type. The engine itself stays behind the
//! [`Engine`] trait so tests and embedders can inject their own bindings.

mod content;
mod diagnostic;
mod engine;
mod errors;
mod handle;
mod path;
mod printer;
mod session;
pub mod telemetry;


pub use content::{FormatOptions, FormatResult, LintOptions};
pub use diagnostic::{Diagnostic, Location, Severity, TextRange, has_blocking};
pub use engine::{
    CloseFileParams, DiagnosticPrinter, Engine, EngineError, FormatFileParams, FormatRangeParams,
    FormatterIrParams, OpenFileParams, Printed, PullDiagnosticsParams, PullDiagnosticsResult,
    RuleCategory, UpdateSettingsParams,
};
pub use errors::{EngineOperation, ErrorKind, SessionError, UsageError};
pub use path::EnginePath;
pub use session::{CreateOptions, Distribution, EngineLoader, PrintOptions, Session};
