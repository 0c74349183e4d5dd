//! Ownership of the engine and the scoped-file protocol.

use tracing::{debug, warn};

use crate::engine::{CloseFileParams, DiagnosticPrinter, Engine, OpenFileParams, UpdateSettingsParams};
use crate::errors::{EngineOperation, SessionError};
use crate::path::EnginePath;

const HANDLE_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::handle");

/// Exclusive owner of one engine workspace.
#[derive(Debug)]
pub(crate) struct EngineHandle {
    engine: Box<dyn Engine>,
}

impl EngineHandle {
    pub(crate) fn new(engine: Box<dyn Engine>) -> Self {
        Self { engine }
    }

    pub(crate) fn update_settings(
        &mut self,
        params: UpdateSettingsParams,
    ) -> Result<(), SessionError> {
        self.engine
            .update_settings(params)
            .map_err(SessionError::translate(EngineOperation::UpdateSettings))
    }

    /// Registers `content` under `path`, runs `operation`, and unregisters the
    /// path again whatever the outcome.
    ///
    /// A close failure is reported only when `operation` succeeded; otherwise
    /// the operation's own error wins and the close failure is logged.
    pub(crate) fn with_scoped_file<T, F>(
        &mut self,
        path: &EnginePath,
        content: &str,
        operation: F,
    ) -> Result<T, SessionError>
    where
        F: FnOnce(&mut dyn Engine, &EnginePath) -> Result<T, SessionError>,
    {
        let mut file = ScopedFile::open(self.engine.as_mut(), path, content)?;
        let result = operation(file.engine(), path);
        let close_result = file.close();

        match (result, close_result) {
            (Err(error), Err(close_error)) => {
                warn!(
                    target: HANDLE_TARGET,
                    path = %path,
                    error = %close_error,
                    "close failed after the scoped operation had already failed"
                );
                Err(error)
            }
            (Err(error), Ok(())) | (Ok(_), Err(error)) => Err(error),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    pub(crate) fn diagnostic_printer(
        &mut self,
        file_path: &EnginePath,
        file_source: &str,
    ) -> Result<Box<dyn DiagnosticPrinter>, SessionError> {
        self.engine
            .diagnostic_printer(file_path.as_path(), file_source)
            .map_err(SessionError::translate(EngineOperation::CreatePrinter))
    }

    /// Frees the engine-side workspace.
    pub(crate) fn release(self) {
        debug!(target: HANDLE_TARGET, "releasing engine workspace");
        self.engine.release();
    }
}

/// Open-file registration that is closed exactly once.
///
/// The normal path calls [`ScopedFile::close`] so the close result can be
/// reported. If the guard is dropped while still open (a panic unwinding
/// through the scoped operation) the file is closed from `Drop` and any
/// failure is logged.
struct ScopedFile<'a> {
    engine: &'a mut dyn Engine,
    path: EnginePath,
    open: bool,
}

impl<'a> ScopedFile<'a> {
    fn open(
        engine: &'a mut dyn Engine,
        path: &EnginePath,
        content: &str,
    ) -> Result<Self, SessionError> {
        engine
            .open_file(OpenFileParams {
                path: path.clone(),
                content: content.to_owned(),
                version: 0,
            })
            .map_err(SessionError::translate(EngineOperation::OpenFile))?;
        debug!(target: HANDLE_TARGET, path = %path, "opened scoped file");
        Ok(Self {
            engine,
            path: path.clone(),
            open: true,
        })
    }

    fn engine(&mut self) -> &mut dyn Engine {
        &mut *self.engine
    }

    fn close(mut self) -> Result<(), SessionError> {
        self.open = false;
        let result = self.close_registration();
        debug!(
            target: HANDLE_TARGET,
            path = %self.path,
            closed = result.is_ok(),
            "closed scoped file"
        );
        result
    }

    fn close_registration(&mut self) -> Result<(), SessionError> {
        self.engine
            .close_file(CloseFileParams {
                path: self.path.clone(),
            })
            .map_err(SessionError::translate(EngineOperation::CloseFile))
    }
}

impl Drop for ScopedFile<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(error) = self.close_registration() {
            warn!(
                target: HANDLE_TARGET,
                path = %self.path,
                error = %error,
                "failed to close scoped file during unwinding"
            );
        }
    }
}
