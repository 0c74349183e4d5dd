//! Recording engine used in tests.
//!
//! The stub behaves like a small but strict engine: it refuses to analyse
//! files that are not open, refuses to open a path twice, and formats by
//! stripping trailing whitespace so results are deterministic and idempotent.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use camino::Utf8Path;
use quill_config::{Configuration, IndentStyle};

use crate::diagnostic::Diagnostic;
use crate::engine::{
    CloseFileParams, DiagnosticPrinter, Engine, EngineError, FormatFileParams, FormatRangeParams,
    FormatterIrParams, OpenFileParams, Printed, PullDiagnosticsParams, PullDiagnosticsResult,
    RuleCategory, UpdateSettingsParams,
};
use crate::path::EnginePath;

/// Discriminates the kind of call recorded by the stub engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `update_settings` was invoked.
    UpdateSettings,
    /// `open_file` was invoked.
    OpenFile,
    /// `close_file` was invoked.
    CloseFile,
    /// `pull_diagnostics` was invoked.
    PullDiagnostics,
    /// `format_file` was invoked.
    FormatFile,
    /// `format_range` was invoked.
    FormatRange,
    /// `formatter_ir` was invoked.
    FormatterIr,
    /// `diagnostic_printer` was invoked.
    CreatePrinter,
    /// `release` was invoked.
    Release,
}

/// Discriminates the calls recorded against printers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterCall {
    /// `print_simple` was invoked.
    Simple,
    /// `print_verbose` was invoked.
    Verbose,
    /// `finish` was invoked.
    Finish,
    /// `free` was invoked.
    Free,
}

/// Static responses returned by the stub engine.
#[derive(Debug, Clone, Default)]
pub struct ResponseSet {
    /// Diagnostics returned for the syntax category.
    pub syntax: Vec<Diagnostic>,
    /// Diagnostics returned for the lint category.
    pub lint: Vec<Diagnostic>,
    /// Calls that fail with an engine error.
    pub failing_calls: HashSet<CallKind>,
    /// Diagnostics attached to injected failures.
    pub failure_diagnostics: Vec<Diagnostic>,
    /// One-based index of the printer render call that fails.
    pub failing_print: Option<usize>,
    /// Whether `finish` fails.
    pub failing_finish: bool,
}

impl ResponseSet {
    /// Responses with the given syntax diagnostics and nothing else.
    #[must_use]
    pub fn with_syntax(syntax: Vec<Diagnostic>) -> Self {
        Self {
            syntax,
            ..Self::default()
        }
    }

    /// Adds a call that fails.
    #[must_use]
    pub fn failing(mut self, call: CallKind) -> Self {
        self.failing_calls.insert(call);
        self
    }
}

/// Test double that records every call routed through it.
#[derive(Clone)]
pub struct RecordingEngine {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingEngine {
    /// Creates an engine that answers with the provided responses.
    pub fn new(responses: ResponseSet) -> Self {
        Self {
            shared: Arc::new(Mutex::new(RecordingState::new(responses))),
        }
    }

    /// Returns a handle that can be used to assert recorded calls.
    pub fn handle(&self) -> RecordingEngineHandle {
        RecordingEngineHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    fn with_open_file<R>(
        &mut self,
        call: CallKind,
        path: &EnginePath,
        action: impl FnOnce(&mut RecordingState, &str) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        with_state(&self.shared, |state| {
            state.record(call)?;
            let content = state
                .open_files
                .get(path)
                .cloned()
                .ok_or_else(|| EngineError::new(format!("{path} is not open")))?;
            action(state, &content)
        })
    }
}

impl Engine for RecordingEngine {
    fn update_settings(&mut self, params: UpdateSettingsParams) -> Result<(), EngineError> {
        with_state(&self.shared, |state| {
            state.record(CallKind::UpdateSettings)?;
            state.ignore_matches = params.gitignore_matches;
            state.settings = Some(params.configuration);
            Ok(())
        })
    }

    fn open_file(&mut self, params: OpenFileParams) -> Result<(), EngineError> {
        with_state(&self.shared, |state| {
            state.record(CallKind::OpenFile)?;
            if state.open_files.contains_key(&params.path) {
                return Err(EngineError::new(format!("{} is already open", params.path)));
            }
            state.versions.push(params.version);
            state.open_files.insert(params.path, params.content);
            Ok(())
        })
    }

    fn close_file(&mut self, params: CloseFileParams) -> Result<(), EngineError> {
        with_state(&self.shared, |state| {
            let removed = state.open_files.remove(&params.path);
            state.record(CallKind::CloseFile)?;
            removed
                .map(|_| ())
                .ok_or_else(|| EngineError::new(format!("{} is not open", params.path)))
        })
    }

    fn pull_diagnostics(
        &mut self,
        params: PullDiagnosticsParams,
    ) -> Result<PullDiagnosticsResult, EngineError> {
        let categories = params.categories;
        let limit = params.max_diagnostics;
        self.with_open_file(CallKind::PullDiagnostics, &params.path, |state, _| {
            if limit != u64::MAX {
                return Err(EngineError::new(format!("unexpected limit {limit}")));
            }
            let mut diagnostics = Vec::new();
            if categories.contains(&RuleCategory::Syntax) {
                diagnostics.extend(state.responses.syntax.iter().cloned());
            }
            if categories.contains(&RuleCategory::Lint) {
                diagnostics.extend(state.responses.lint.iter().cloned());
            }
            state.pulled_categories.push(categories);
            Ok(PullDiagnosticsResult {
                diagnostics,
                skipped_diagnostics: 0,
            })
        })
    }

    fn format_file(&mut self, params: FormatFileParams) -> Result<Printed, EngineError> {
        self.with_open_file(CallKind::FormatFile, &params.path, |state, content| {
            Ok(Printed {
                code: format_source(content, state.indent()),
                range: None,
            })
        })
    }

    fn format_range(&mut self, params: FormatRangeParams) -> Result<Printed, EngineError> {
        let range = params.range;
        self.with_open_file(CallKind::FormatRange, &params.path, |state, content| {
            let start = usize::try_from(range.start()).unwrap_or(usize::MAX);
            let end = usize::try_from(range.end()).unwrap_or(usize::MAX);
            let (Some(prefix), Some(segment), Some(suffix)) =
                (content.get(..start), content.get(start..end), content.get(end..))
            else {
                return Err(EngineError::new(format!("range {range} is out of bounds")));
            };
            let code = format!(
                "{prefix}{}{suffix}",
                format_lines(segment, state.indent())
            );
            Ok(Printed {
                code,
                range: Some(range),
            })
        })
    }

    fn formatter_ir(&mut self, params: FormatterIrParams) -> Result<String, EngineError> {
        self.with_open_file(CallKind::FormatterIr, &params.path, |state, content| {
            Ok(format!("group([{:?}])", format_source(content, state.indent())))
        })
    }

    fn diagnostic_printer(
        &mut self,
        file_path: &Utf8Path,
        file_source: &str,
    ) -> Result<Box<dyn DiagnosticPrinter>, EngineError> {
        with_state(&self.shared, |state| state.record(CallKind::CreatePrinter))?;
        Ok(Box::new(RecordingPrinter {
            shared: Arc::clone(&self.shared),
            path: file_path.to_string(),
            source: file_source.to_owned(),
            output: String::new(),
            renders: 0,
        }))
    }

    fn release(self: Box<Self>) {
        with_state(&self.shared, |state| {
            state.calls.push(CallKind::Release);
        });
    }
}

/// Printer double sharing state with its engine.
struct RecordingPrinter {
    shared: Arc<Mutex<RecordingState>>,
    path: String,
    source: String,
    output: String,
    renders: usize,
}

impl RecordingPrinter {
    fn render(
        &mut self,
        call: PrinterCall,
        rendered: impl FnOnce(&str, &str) -> String,
    ) -> Result<(), EngineError> {
        self.renders += 1;
        let failing = with_state(&self.shared, |state| {
            state.printer_calls.push(call);
            state.responses.failing_print == Some(self.renders)
        });
        if failing {
            return Err(EngineError::new(format!(
                "intentional failure rendering diagnostic {}",
                self.renders
            )));
        }
        self.output.push_str(&rendered(&self.path, &self.source));
        Ok(())
    }
}

impl DiagnosticPrinter for RecordingPrinter {
    fn print_simple(&mut self, diagnostic: &Diagnostic) -> Result<(), EngineError> {
        self.render(PrinterCall::Simple, |path, _| render_simple(path, diagnostic))
    }

    fn print_verbose(&mut self, diagnostic: &Diagnostic) -> Result<(), EngineError> {
        self.render(PrinterCall::Verbose, |path, source| {
            render_verbose(path, source, diagnostic)
        })
    }

    fn finish(self: Box<Self>) -> Result<String, EngineError> {
        let failing = with_state(&self.shared, |state| {
            state.printer_calls.push(PrinterCall::Finish);
            state.responses.failing_finish
        });
        if failing {
            return Err(EngineError::new("intentional finish failure"));
        }
        Ok(self.output)
    }

    fn free(self: Box<Self>) {
        with_state(&self.shared, |state| state.printer_calls.push(PrinterCall::Free));
    }
}

/// Short rendering produced by the stub printer.
pub fn render_simple(path: &str, diagnostic: &Diagnostic) -> String {
    format!("{path} {}: {}\n", diagnostic.severity, diagnostic.message)
}

/// Verbose rendering produced by the stub printer.
pub fn render_verbose(path: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let category = diagnostic.category.as_deref().unwrap_or("unknown");
    let snippet = diagnostic
        .location
        .span
        .and_then(|span| {
            let start = usize::try_from(span.start()).ok()?;
            let end = usize::try_from(span.end()).ok()?;
            source.get(start..end)
        })
        .unwrap_or_default();
    format!(
        "{path} {category} {}\n  {}\n  > {snippet}\n",
        diagnostic.severity, diagnostic.message
    )
}

/// Whole-file formatting applied by the stub engine.
pub fn format_source(content: &str, indent: Option<usize>) -> String {
    let mut formatted = format_lines(content, indent);
    let trimmed = formatted.trim_end_matches('\n').len();
    formatted.truncate(trimmed);
    formatted.push('\n');
    formatted
}

fn format_lines(content: &str, indent: Option<usize>) -> String {
    content
        .split_inclusive('\n')
        .map(|line| {
            let (body, newline) = match line.strip_suffix('\n') {
                Some(body) => (body, "\n"),
                None => (line, ""),
            };
            let body = body.trim_end();
            let body = match indent {
                Some(width) => {
                    let tabs = body.len() - body.trim_start_matches('\t').len();
                    format!("{}{}", " ".repeat(tabs * width), body.trim_start_matches('\t'))
                }
                None => body.to_owned(),
            };
            format!("{body}{newline}")
        })
        .collect()
}

/// Handle that exposes recorded state for assertions.
#[derive(Clone)]
pub struct RecordingEngineHandle {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingEngineHandle {
    /// Returns the ordered list of engine calls.
    pub fn calls(&self) -> Vec<CallKind> {
        with_state(&self.shared, |state| state.calls.clone())
    }

    /// Number of recorded calls of `kind`.
    pub fn count(&self, kind: CallKind) -> usize {
        with_state(&self.shared, |state| {
            state.calls.iter().filter(|call| **call == kind).count()
        })
    }

    /// Number of registrations still open.
    pub fn open_files(&self) -> usize {
        with_state(&self.shared, |state| state.open_files.len())
    }

    /// Versions passed to every `open_file` call.
    pub fn versions(&self) -> Vec<i32> {
        with_state(&self.shared, |state| state.versions.clone())
    }

    /// Categories requested by every diagnostic pull.
    pub fn pulled_categories(&self) -> Vec<Vec<RuleCategory>> {
        with_state(&self.shared, |state| state.pulled_categories.clone())
    }

    /// Ordered list of printer calls.
    pub fn printer_calls(&self) -> Vec<PrinterCall> {
        with_state(&self.shared, |state| state.printer_calls.clone())
    }

    /// Number of printer calls of `kind`.
    pub fn printer_count(&self, kind: PrinterCall) -> usize {
        with_state(&self.shared, |state| {
            state.printer_calls.iter().filter(|call| **call == kind).count()
        })
    }

    /// Last applied configuration.
    pub fn settings(&self) -> Option<Configuration> {
        with_state(&self.shared, |state| state.settings.clone())
    }

    /// Ignore patterns sent with the last settings update.
    pub fn ignore_matches(&self) -> Vec<String> {
        with_state(&self.shared, |state| state.ignore_matches.clone())
    }

    /// Replaces the canned responses.
    pub fn set_responses(&self, responses: ResponseSet) {
        with_state(&self.shared, |state| state.responses = responses);
    }
}

fn with_state<R, F>(shared: &Arc<Mutex<RecordingState>>, action: F) -> R
where
    F: FnOnce(&mut RecordingState) -> R,
{
    let mut guard = shared.lock().unwrap_or_else(|poison| poison.into_inner());
    action(&mut guard)
}

#[derive(Debug)]
struct RecordingState {
    responses: ResponseSet,
    calls: Vec<CallKind>,
    open_files: HashMap<EnginePath, String>,
    versions: Vec<i32>,
    pulled_categories: Vec<Vec<RuleCategory>>,
    printer_calls: Vec<PrinterCall>,
    settings: Option<Configuration>,
    ignore_matches: Vec<String>,
}

impl RecordingState {
    fn new(responses: ResponseSet) -> Self {
        Self {
            responses,
            calls: Vec::new(),
            open_files: HashMap::new(),
            versions: Vec::new(),
            pulled_categories: Vec::new(),
            printer_calls: Vec::new(),
            settings: None,
            ignore_matches: Vec::new(),
        }
    }

    fn record(&mut self, call: CallKind) -> Result<(), EngineError> {
        self.calls.push(call);
        if self.responses.failing_calls.contains(&call) {
            return Err(EngineError::new(format!("intentional {call:?} failure"))
                .with_diagnostics(self.responses.failure_diagnostics.clone()));
        }
        Ok(())
    }

    fn indent(&self) -> Option<usize> {
        let formatter = self.settings.as_ref()?.formatter.as_ref()?;
        match formatter.indent_style {
            Some(IndentStyle::Space) => Some(usize::from(formatter.indent_width.unwrap_or(2))),
            _ => None,
        }
    }
}
