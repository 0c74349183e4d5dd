//! Scoped ownership of an engine diagnostic printer.
//!
//! The printer leaves through exactly one exit: [`PrinterScope::finish`] hands
//! it to the engine's own finaliser, and dropping the scope without finishing
//! frees it. Rendering errors return early through `?`, so the drop path is
//! the failure path.

use tracing::{debug, warn};

use crate::diagnostic::Diagnostic;
use crate::engine::{DiagnosticPrinter, EngineError};
use crate::errors::{EngineOperation, SessionError};

const PRINTER_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::printer");

/// Renderer applied to each diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrintMode {
    Simple,
    Verbose,
}

impl PrintMode {
    pub(crate) const fn from_verbose(verbose: bool) -> Self {
        if verbose { Self::Verbose } else { Self::Simple }
    }
}

pub(crate) struct PrinterScope {
    printer: Option<Box<dyn DiagnosticPrinter>>,
}

impl PrinterScope {
    pub(crate) fn new(printer: Box<dyn DiagnosticPrinter>) -> Self {
        Self {
            printer: Some(printer),
        }
    }

    /// Renders every diagnostic in order, then finishes the printer.
    pub(crate) fn print_all(
        mut self,
        diagnostics: &[Diagnostic],
        mode: PrintMode,
    ) -> Result<String, SessionError> {
        for diagnostic in diagnostics {
            self.print(diagnostic, mode)?;
        }
        self.finish()
    }

    fn print(&mut self, diagnostic: &Diagnostic, mode: PrintMode) -> Result<(), SessionError> {
        let printer = self.printer.as_deref_mut().ok_or_else(released)?;
        let rendered = match mode {
            PrintMode::Simple => printer.print_simple(diagnostic),
            PrintMode::Verbose => printer.print_verbose(diagnostic),
        };
        rendered.map_err(SessionError::translate(EngineOperation::PrintDiagnostic))
    }

    fn finish(mut self) -> Result<String, SessionError> {
        let printer = self.printer.take().ok_or_else(released)?;
        let output = printer
            .finish()
            .map_err(SessionError::translate(EngineOperation::FinishPrinter))?;
        debug!(
            target: PRINTER_TARGET,
            bytes = output.len(),
            "diagnostic printer finished"
        );
        Ok(output)
    }
}

impl Drop for PrinterScope {
    fn drop(&mut self) {
        if let Some(printer) = self.printer.take() {
            warn!(
                target: PRINTER_TARGET,
                "releasing diagnostic printer without output"
            );
            printer.free();
        }
    }
}

fn released() -> SessionError {
    SessionError::engine(
        EngineOperation::PrintDiagnostic,
        EngineError::new("diagnostic printer has already been released"),
    )
}
