//! Error types surfaced by the session layer.
//!
//! Engine failures never leave a public operation as a raw [`EngineError`]:
//! they are wrapped in a [`SessionError`] whose variant is chosen by the
//! [`EngineOperation`] that raised them.

use std::fmt;

use strum::{Display, EnumString};
use thiserror::Error;

use quill_config::ConfigurationError;

use crate::diagnostic::Diagnostic;
use crate::engine::EngineError;

/// Engine call being executed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOperation {
    /// Loading the engine module and creating its workspace.
    Bootstrap,
    /// Workspace-wide settings update.
    UpdateSettings,
    /// File registration.
    OpenFile,
    /// File unregistration.
    CloseFile,
    /// Diagnostic collection.
    PullDiagnostics,
    /// Whole-file formatting.
    FormatFile,
    /// Ranged formatting.
    FormatRange,
    /// Formatter IR retrieval.
    FormatterIr,
    /// Printer construction.
    CreatePrinter,
    /// Rendering one diagnostic.
    PrintDiagnostic,
    /// Extracting the printer output.
    FinishPrinter,
}

impl EngineOperation {
    /// Error kind this operation's failures are reported as.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::Bootstrap => ErrorKind::Bootstrap,
            Self::UpdateSettings => ErrorKind::Configuration,
            Self::OpenFile | Self::CloseFile => ErrorKind::FileRegistration,
            Self::PullDiagnostics | Self::FormatFile | Self::FormatRange | Self::FormatterIr => {
                ErrorKind::Analysis
            }
            Self::CreatePrinter | Self::PrintDiagnostic | Self::FinishPrinter => ErrorKind::Print,
        }
    }
}

impl fmt::Display for EngineOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bootstrap => "bootstrap",
            Self::UpdateSettings => "updateSettings",
            Self::OpenFile => "openFile",
            Self::CloseFile => "closeFile",
            Self::PullDiagnostics => "pullDiagnostics",
            Self::FormatFile => "formatFile",
            Self::FormatRange => "formatRange",
            Self::FormatterIr => "getFormatterIr",
            Self::CreatePrinter => "createPrinter",
            Self::PrintDiagnostic => "printDiagnostic",
            Self::FinishPrinter => "finishPrinter",
        };
        formatter.write_str(label)
    }
}

/// Coarse classification of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// The engine could not be started.
    Bootstrap,
    /// Settings were rejected.
    Configuration,
    /// A file could not be opened or closed.
    FileRegistration,
    /// Diagnostics, formatting or IR retrieval failed.
    Analysis,
    /// Rendering diagnostics failed.
    Print,
    /// The session was used after shutdown.
    Usage,
}

/// Misuse of a session by its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    /// An operation ran after [`crate::Session::shutdown`].
    #[error("session has been shut down")]
    ShutDown,
}

/// Errors returned by [`crate::Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The engine loader failed.
    #[error("failed to start the analysis engine: {source}")]
    Bootstrap {
        /// Underlying error.
        #[source]
        source: EngineError,
    },

    /// The configuration failed local validation.
    #[error("invalid configuration: {source}")]
    InvalidConfiguration {
        /// Validation failure.
        #[source]
        source: ConfigurationError,
    },

    /// The engine rejected a settings update.
    #[error("engine rejected the configuration during {operation}: {source}")]
    Configuration {
        /// Operation that failed.
        operation: EngineOperation,
        /// Underlying error.
        #[source]
        source: EngineError,
    },

    /// Opening or closing a scoped file failed.
    #[error("file registration failed during {operation}: {source}")]
    FileRegistration {
        /// Operation that failed.
        operation: EngineOperation,
        /// Underlying error.
        #[source]
        source: EngineError,
    },

    /// Diagnostics, formatting or IR retrieval failed.
    #[error("analysis failed during {operation}: {source}")]
    Analysis {
        /// Operation that failed.
        operation: EngineOperation,
        /// Underlying error.
        #[source]
        source: EngineError,
    },

    /// Rendering diagnostics failed.
    #[error("printing diagnostics failed during {operation}: {source}")]
    Print {
        /// Operation that failed.
        operation: EngineOperation,
        /// Underlying error.
        #[source]
        source: EngineError,
    },

    /// The caller broke the session contract.
    #[error(transparent)]
    Usage(#[from] UsageError),
}

impl SessionError {
    /// Wraps an engine failure according to the operation that raised it.
    pub(crate) fn engine(operation: EngineOperation, source: EngineError) -> Self {
        match operation {
            EngineOperation::Bootstrap => Self::Bootstrap { source },
            EngineOperation::UpdateSettings => Self::Configuration { operation, source },
            EngineOperation::OpenFile | EngineOperation::CloseFile => {
                Self::FileRegistration { operation, source }
            }
            EngineOperation::PullDiagnostics
            | EngineOperation::FormatFile
            | EngineOperation::FormatRange
            | EngineOperation::FormatterIr => Self::Analysis { operation, source },
            EngineOperation::CreatePrinter
            | EngineOperation::PrintDiagnostic
            | EngineOperation::FinishPrinter => Self::Print { operation, source },
        }
    }

    /// Returns a translator for `map_err` at an engine call site.
    pub(crate) fn translate(operation: EngineOperation) -> impl FnOnce(EngineError) -> Self {
        move |source| Self::engine(operation, source)
    }

    /// Coarse classification of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Bootstrap { .. } => ErrorKind::Bootstrap,
            Self::InvalidConfiguration { .. } | Self::Configuration { .. } => {
                ErrorKind::Configuration
            }
            Self::FileRegistration { .. } => ErrorKind::FileRegistration,
            Self::Analysis { .. } => ErrorKind::Analysis,
            Self::Print { .. } => ErrorKind::Print,
            Self::Usage(_) => ErrorKind::Usage,
        }
    }

    /// Engine call that failed, if the error came from the engine.
    #[must_use]
    pub const fn operation(&self) -> Option<EngineOperation> {
        match self {
            Self::Bootstrap { .. } => Some(EngineOperation::Bootstrap),
            Self::Configuration { operation, .. }
            | Self::FileRegistration { operation, .. }
            | Self::Analysis { operation, .. }
            | Self::Print { operation, .. } => Some(*operation),
            Self::InvalidConfiguration { .. } | Self::Usage(_) => None,
        }
    }

    /// Diagnostics carried by the failure.
    ///
    /// When formatting fails after syntax analysis succeeded, the collected
    /// syntax diagnostics come first, followed by any the engine attached.
    #[must_use]
    pub fn engine_diagnostics(&self) -> &[Diagnostic] {
        match self.engine_error() {
            Some(source) => source.diagnostics(),
            None => &[],
        }
    }

    /// Underlying engine failure, if any.
    #[must_use]
    pub const fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Self::Bootstrap { source }
            | Self::Configuration { source, .. }
            | Self::FileRegistration { source, .. }
            | Self::Analysis { source, .. }
            | Self::Print { source, .. } => Some(source),
            Self::InvalidConfiguration { .. } | Self::Usage(_) => None,
        }
    }
}

impl From<ConfigurationError> for SessionError {
    fn from(source: ConfigurationError) -> Self {
        Self::InvalidConfiguration { source }
    }
}
