//! Session facade over one engine workspace.

use std::future::Future;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use quill_config::Configuration;

use crate::content::{self, FormatOptions, FormatResult, LintOptions};
use crate::diagnostic::Diagnostic;
use crate::engine::{Engine, EngineError, UpdateSettingsParams};
use crate::errors::{EngineOperation, SessionError, UsageError};
use crate::handle::EngineHandle;
use crate::path::EnginePath;
use crate::printer::{PrintMode, PrinterScope};

const SESSION_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::session");

/// Build of the engine module to load.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Distribution {
    /// Build targeting a server-side runtime.
    #[default]
    Node,
    /// Build targeting browsers without a bundler.
    Web,
    /// Build targeting bundler toolchains.
    Bundler,
}

/// Options for [`Session::create`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptions {
    /// Module build to load.
    #[serde(default)]
    pub distribution: Distribution,
}

/// Loads the engine module and creates its workspace.
///
/// This is the only suspension point of a session: everything after
/// [`Session::create`] runs synchronously.
pub trait EngineLoader {
    /// Produces a ready engine for the requested distribution.
    fn load(
        &self,
        distribution: Distribution,
    ) -> impl Future<Output = Result<Box<dyn Engine>, EngineError>> + Send;
}

/// Options for [`Session::print_diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    /// Path shown in rendered output.
    pub file_path: EnginePath,
    /// Source text the diagnostic spans point into.
    pub file_source: String,
    /// Render with source context and advice.
    #[serde(default)]
    pub verbose: bool,
}

impl PrintOptions {
    /// Simple-mode options for `file_path` and `file_source`.
    #[must_use]
    pub fn new(file_path: impl Into<EnginePath>, file_source: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            file_source: file_source.into(),
            verbose: false,
        }
    }

    /// Selects the verbose renderer.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug)]
enum SessionState {
    Ready(EngineHandle),
    ShutDown,
}

/// Entry point for formatting, linting and printing diagnostics.
///
/// A session owns exactly one engine workspace from [`Session::create`] until
/// [`Session::shutdown`] (or drop). Operations take `&mut self`, so calls
/// against one session never interleave; callers sharing a session across
/// threads wrap it in their own lock.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// Loads the engine and returns a ready session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Bootstrap`] when the loader fails.
    pub async fn create<L>(loader: &L, options: CreateOptions) -> Result<Self, SessionError>
    where
        L: EngineLoader,
    {
        debug!(
            target: SESSION_TARGET,
            distribution = %options.distribution,
            "loading analysis engine"
        );
        let engine = loader
            .load(options.distribution)
            .await
            .map_err(SessionError::translate(EngineOperation::Bootstrap))?;
        Ok(Self::from_engine(engine))
    }

    pub(crate) fn from_engine(engine: Box<dyn Engine>) -> Self {
        Self {
            state: SessionState::Ready(EngineHandle::new(engine)),
        }
    }

    /// Releases the engine workspace. The session is unusable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ShutDown`] if the session was already shut down.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.state, SessionState::ShutDown) {
            SessionState::Ready(handle) => {
                handle.release();
                debug!(target: SESSION_TARGET, "session shut down");
                Ok(())
            }
            SessionState::ShutDown => Err(UsageError::ShutDown.into()),
        }
    }

    /// Whether [`Session::shutdown`] has run.
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        matches!(self.state, SessionState::ShutDown)
    }

    /// Validates `configuration` and applies it to the whole workspace.
    ///
    /// The settings stay in force for every later operation until replaced.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when validation or the engine rejects
    /// the settings, or a usage error after shutdown.
    pub fn apply_configuration(
        &mut self,
        configuration: &Configuration,
    ) -> Result<(), SessionError> {
        let handle = self.handle_mut()?;
        configuration.validate()?;
        handle.update_settings(UpdateSettingsParams {
            configuration: configuration.clone(),
            gitignore_matches: Vec::new(),
        })?;
        debug!(target: SESSION_TARGET, "configuration applied");
        Ok(())
    }

    /// Formats `content` as though it lived at `options.file_path`.
    ///
    /// Syntax diagnostics are collected first. If any of them is an error or
    /// fatal, formatting is skipped and the content comes back unchanged.
    ///
    /// # Errors
    ///
    /// Returns a file registration or analysis error when the engine fails,
    /// or a usage error after shutdown. The file is closed in every case.
    pub fn format_content(
        &mut self,
        content: &str,
        options: &FormatOptions,
    ) -> Result<FormatResult, SessionError> {
        let handle = self.handle_mut()?;
        content::format_content(handle, content, options)
    }

    /// Collects syntax and lint diagnostics for `content`.
    ///
    /// # Errors
    ///
    /// Returns a file registration or analysis error when the engine fails,
    /// or a usage error after shutdown. The file is closed in every case.
    pub fn lint_content(
        &mut self,
        content: &str,
        options: &LintOptions,
    ) -> Result<Vec<Diagnostic>, SessionError> {
        let handle = self.handle_mut()?;
        content::lint_content(handle, content, options)
    }

    /// Renders previously collected diagnostics to a string.
    ///
    /// # Errors
    ///
    /// Returns a print error when the engine fails to create, drive or finish
    /// the printer, or a usage error after shutdown. No partial output is
    /// returned on failure.
    pub fn print_diagnostics(
        &mut self,
        diagnostics: &[Diagnostic],
        options: &PrintOptions,
    ) -> Result<String, SessionError> {
        let handle = self.handle_mut()?;
        let printer = handle.diagnostic_printer(&options.file_path, &options.file_source)?;
        PrinterScope::new(printer).print_all(diagnostics, PrintMode::from_verbose(options.verbose))
    }

    fn handle_mut(&mut self) -> Result<&mut EngineHandle, SessionError> {
        match &mut self.state {
            SessionState::Ready(handle) => Ok(handle),
            SessionState::ShutDown => Err(UsageError::ShutDown.into()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let SessionState::Ready(handle) =
            std::mem::replace(&mut self.state, SessionState::ShutDown)
        {
            debug!(
                target: SESSION_TARGET,
                "session dropped without shutdown; releasing engine"
            );
            handle.release();
        }
    }
}
