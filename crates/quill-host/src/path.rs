//! Engine-side file identifiers.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Path used to address a file registered with the engine.
///
/// The engine never touches the file system through this value; it is only a
/// key into the engine's open-file table, so it does not need to exist on
/// disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EnginePath {
    path: Utf8PathBuf,
}

impl EnginePath {
    /// Wraps the supplied path.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Borrowed view of the wrapped path.
    #[must_use]
    pub fn as_path(&self) -> &Utf8Path {
        self.path.as_path()
    }
}

impl fmt::Display for EnginePath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path.as_str())
    }
}

impl From<&str> for EnginePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<Utf8PathBuf> for EnginePath {
    fn from(path: Utf8PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Utf8Path> for EnginePath {
    fn from(path: &Utf8Path) -> Self {
        Self::new(path)
    }
}
