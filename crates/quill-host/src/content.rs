//! Format and lint orchestration over scoped files.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostic::{Diagnostic, TextRange, has_blocking};
use crate::engine::{
    Engine, EngineError, FormatFileParams, FormatRangeParams, FormatterIrParams,
    PullDiagnosticsParams, RuleCategory,
};
use crate::errors::{EngineOperation, SessionError};
use crate::handle::EngineHandle;
use crate::path::EnginePath;

const CONTENT_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::content");

/// Largest diagnostic count the engine can be asked for.
const UNBOUNDED_DIAGNOSTICS: u64 = u64::MAX;

/// Options for [`crate::Session::format_content`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    /// Path the content is registered under; selects the language.
    pub file_path: EnginePath,
    /// Restricts formatting to this byte range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TextRange>,
    /// Also return the formatter IR.
    #[serde(default)]
    pub debug: bool,
}

impl FormatOptions {
    /// Whole-file, non-debug options for `file_path`.
    #[must_use]
    pub fn new(file_path: impl Into<EnginePath>) -> Self {
        Self {
            file_path: file_path.into(),
            range: None,
            debug: false,
        }
    }

    /// Restricts formatting to `range`.
    #[must_use]
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Requests the formatter IR alongside the result.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Options for [`crate::Session::lint_content`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintOptions {
    /// Path the content is registered under; selects the language.
    pub file_path: EnginePath,
}

impl LintOptions {
    /// Options for `file_path`.
    #[must_use]
    pub fn new(file_path: impl Into<EnginePath>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

/// Outcome of [`crate::Session::format_content`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResult {
    /// Formatted code, or the input unchanged when syntax errors blocked
    /// formatting.
    pub content: String,
    /// Syntax diagnostics collected before formatting.
    pub diagnostics: Vec<Diagnostic>,
    /// Formatter IR, present only for debug requests that were formatted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ir: Option<String>,
}

impl FormatResult {
    /// Whether the diagnostics prevented formatting.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        has_blocking(&self.diagnostics)
    }
}

pub(crate) fn format_content(
    handle: &mut EngineHandle,
    content: &str,
    options: &FormatOptions,
) -> Result<FormatResult, SessionError> {
    handle.with_scoped_file(&options.file_path, content, |engine, path| {
        let diagnostics = pull_diagnostics(engine, path, vec![RuleCategory::Syntax])?;
        let blocking = has_blocking(&diagnostics);
        debug!(
            target: CONTENT_TARGET,
            path = %path,
            diagnostics = diagnostics.len(),
            blocking,
            "collected syntax diagnostics"
        );
        if blocking {
            return Ok(FormatResult {
                content: content.to_owned(),
                diagnostics,
                ir: None,
            });
        }

        let printed = match options.range {
            Some(range) => engine
                .format_range(FormatRangeParams {
                    path: path.clone(),
                    range,
                })
                .map_err(with_collected(EngineOperation::FormatRange, &diagnostics))?,
            None => engine
                .format_file(FormatFileParams { path: path.clone() })
                .map_err(with_collected(EngineOperation::FormatFile, &diagnostics))?,
        };

        let ir = if options.debug {
            let ir = engine
                .formatter_ir(FormatterIrParams { path: path.clone() })
                .map_err(with_collected(EngineOperation::FormatterIr, &diagnostics))?;
            Some(ir)
        } else {
            None
        };

        Ok(FormatResult {
            content: printed.code,
            diagnostics,
            ir,
        })
    })
}

pub(crate) fn lint_content(
    handle: &mut EngineHandle,
    content: &str,
    options: &LintOptions,
) -> Result<Vec<Diagnostic>, SessionError> {
    handle.with_scoped_file(&options.file_path, content, |engine, path| {
        pull_diagnostics(engine, path, vec![RuleCategory::Syntax, RuleCategory::Lint])
    })
}

/// Translates a failure that happened after syntax diagnostics were
/// collected; the diagnostics travel with the error.
fn with_collected(
    operation: EngineOperation,
    diagnostics: &[Diagnostic],
) -> impl FnOnce(EngineError) -> SessionError + '_ {
    move |error| {
        SessionError::engine(
            operation,
            error.with_collected_diagnostics(diagnostics.to_vec()),
        )
    }
}

fn pull_diagnostics(
    engine: &mut dyn Engine,
    path: &EnginePath,
    categories: Vec<RuleCategory>,
) -> Result<Vec<Diagnostic>, SessionError> {
    let result = engine
        .pull_diagnostics(PullDiagnosticsParams {
            path: path.clone(),
            categories,
            max_diagnostics: UNBOUNDED_DIAGNOSTICS,
        })
        .map_err(SessionError::translate(EngineOperation::PullDiagnostics))?;
    if result.skipped_diagnostics > 0 {
        debug!(
            target: CONTENT_TARGET,
            path = %path,
            skipped = result.skipped_diagnostics,
            "engine skipped diagnostics"
        );
    }
    Ok(result.diagnostics)
}
