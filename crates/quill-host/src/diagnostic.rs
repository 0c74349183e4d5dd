//! Diagnostics produced by the engine.

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How serious a diagnostic is.
///
/// Variants are ordered from least to most severe so callers can compare
/// against a threshold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    /// Stylistic suggestion.
    Hint,
    /// Informational note.
    Information,
    /// Likely problem that does not stop processing.
    Warning,
    /// Invalid input.
    Error,
    /// Input the engine could not process at all.
    Fatal,
}

impl Severity {
    /// Whether this severity prevents formatting from running.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

/// Half-open byte range `start..end` within a file.
///
/// `start <= end` always holds, including for deserialised values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(from = "RawTextRange")]
pub struct TextRange {
    start: u32,
    end: u32,
}

/// Wire shape of [`TextRange`] before its bounds are ordered.
#[derive(Deserialize)]
struct RawTextRange {
    start: u32,
    end: u32,
}

impl From<RawTextRange> for TextRange {
    fn from(raw: RawTextRange) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl TextRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Inclusive start offset.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}..{}", self.start, self.end)
    }
}

/// Where a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// File the diagnostic belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Utf8PathBuf>,
    /// Span inside the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<TextRange>,
}

/// A single finding reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Severity assigned by the engine.
    pub severity: Severity,
    /// Rule category, such as `parse` or `lint/suspicious/noDebugger`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Location in the source.
    #[serde(default)]
    pub location: Location,
}

impl Diagnostic {
    /// Builds a diagnostic with no category or location.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: None,
            message: message.into(),
            location: Location::default(),
        }
    }

    /// Attaches a rule category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attaches a file and span.
    #[must_use]
    pub fn at(mut self, path: impl Into<Utf8PathBuf>, span: TextRange) -> Self {
        self.location = Location {
            path: Some(path.into()),
            span: Some(span),
        };
        self
    }

    /// Whether this diagnostic prevents formatting from running.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// Whether any diagnostic in the slice prevents formatting.
#[must_use]
pub fn has_blocking(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_blocking)
}
