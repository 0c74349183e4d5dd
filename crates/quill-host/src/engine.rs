//! Boundary to the analysis engine.
//!
//! The engine is stateful: files must be opened before they can be analysed
//! and closed afterwards, and settings persist across calls. Everything the
//! session layer needs from it is captured by the [`Engine`] and
//! [`DiagnosticPrinter`] traits so tests and embedders can supply their own
//! implementations without the real engine.

use std::error::Error as StdError;
use std::fmt;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use quill_config::Configuration;

use crate::diagnostic::{Diagnostic, TextRange};
use crate::path::EnginePath;

/// Errors reported by engine implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    diagnostics: Vec<Diagnostic>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl EngineError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            diagnostics: Vec::new(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            diagnostics: Vec::new(),
            source: Some(source.into()),
        }
    }

    /// Attaches the diagnostics the engine raised alongside the failure.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Puts `collected` ahead of the diagnostics the engine attached itself.
    pub(crate) fn with_collected_diagnostics(mut self, mut collected: Vec<Diagnostic>) -> Self {
        collected.append(&mut self.diagnostics);
        self.diagnostics = collected;
        self
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Diagnostics carried by the failure, if the engine supplied any.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.as_slice()
    }
}

/// Diagnostic categories the engine can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
pub enum RuleCategory {
    /// Parse errors and other syntax problems.
    Syntax,
    /// Lint rule findings.
    Lint,
}

/// Settings update sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsParams {
    /// Configuration applied workspace-wide.
    pub configuration: Configuration,
    /// Ignore patterns supplied by VCS integration.
    pub gitignore_matches: Vec<String>,
}

/// Registration of in-memory content under a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFileParams {
    /// Path the content is registered under.
    pub path: EnginePath,
    /// Full file content.
    pub content: String,
    /// Document version; scoped registrations always use zero.
    pub version: i32,
}

/// Removal of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseFileParams {
    /// Path to unregister.
    pub path: EnginePath,
}

/// Diagnostic request for an open file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullDiagnosticsParams {
    /// File to analyse.
    pub path: EnginePath,
    /// Categories to collect.
    pub categories: Vec<RuleCategory>,
    /// Upper bound on returned diagnostics.
    pub max_diagnostics: u64,
}

/// Diagnostics returned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullDiagnosticsResult {
    /// Collected diagnostics in engine order.
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics dropped because of `max_diagnostics`.
    #[serde(default)]
    pub skipped_diagnostics: u64,
}

/// Whole-file format request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatFileParams {
    /// File to format.
    pub path: EnginePath,
}

/// Ranged format request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRangeParams {
    /// File to format.
    pub path: EnginePath,
    /// Byte range to format.
    pub range: TextRange,
}

/// Formatter IR request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatterIrParams {
    /// File whose IR is requested.
    pub path: EnginePath,
}

/// Output of a format call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Printed {
    /// Formatted code.
    pub code: String,
    /// Range of the original file the code replaces, for ranged formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TextRange>,
}

/// Behaviour required from concrete engine bindings.
///
/// Implementations own whatever engine-side workspace they wrap. The session
/// layer calls [`Engine::release`] exactly once when it is done with the
/// engine.
pub trait Engine: Send {
    /// Replaces the workspace-wide settings.
    fn update_settings(&mut self, params: UpdateSettingsParams) -> Result<(), EngineError>;

    /// Registers in-memory content under a path.
    fn open_file(&mut self, params: OpenFileParams) -> Result<(), EngineError>;

    /// Removes a registration created by [`Engine::open_file`].
    fn close_file(&mut self, params: CloseFileParams) -> Result<(), EngineError>;

    /// Collects diagnostics for an open file.
    fn pull_diagnostics(
        &mut self,
        params: PullDiagnosticsParams,
    ) -> Result<PullDiagnosticsResult, EngineError>;

    /// Formats an entire open file.
    fn format_file(&mut self, params: FormatFileParams) -> Result<Printed, EngineError>;

    /// Formats a range of an open file.
    fn format_range(&mut self, params: FormatRangeParams) -> Result<Printed, EngineError>;

    /// Returns the formatter's intermediate representation for an open file.
    fn formatter_ir(&mut self, params: FormatterIrParams) -> Result<String, EngineError>;

    /// Creates a printer that renders diagnostics against `file_source`.
    fn diagnostic_printer(
        &mut self,
        file_path: &Utf8Path,
        file_source: &str,
    ) -> Result<Box<dyn DiagnosticPrinter>, EngineError>;

    /// Frees the engine-side workspace.
    fn release(self: Box<Self>);
}

impl fmt::Debug for dyn Engine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Engine")
    }
}

/// Engine-owned object accumulating rendered diagnostics.
///
/// A printer must leave through exactly one of [`DiagnosticPrinter::finish`]
/// or [`DiagnosticPrinter::free`]. `finish` releases the engine-side object
/// itself, whether or not it succeeds.
pub trait DiagnosticPrinter: Send {
    /// Appends the short rendering of a diagnostic.
    fn print_simple(&mut self, diagnostic: &Diagnostic) -> Result<(), EngineError>;

    /// Appends the rendering with source context and advice.
    fn print_verbose(&mut self, diagnostic: &Diagnostic) -> Result<(), EngineError>;

    /// Returns the accumulated output and releases the printer.
    fn finish(self: Box<Self>) -> Result<String, EngineError>;

    /// Releases the printer without producing output.
    fn free(self: Box<Self>);
}

impl fmt::Debug for dyn DiagnosticPrinter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("DiagnosticPrinter")
    }
}
