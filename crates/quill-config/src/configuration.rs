//! Engine-wide settings applied through a session.
//!
//! Every field is optional: an absent value leaves the engine's own default in
//! place. The records serialise in camelCase because that is the shape the
//! engine bridge expects on the wire.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::defaults::{MAX_INDENT_WIDTH, MAX_LINE_WIDTH};

/// Settings payload forwarded to the engine by `apply_configuration`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Configuration {
    /// Language-agnostic formatter settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<FormatterConfiguration>,
    /// Linter settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linter: Option<LinterConfiguration>,
    /// JavaScript-specific settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javascript: Option<JavascriptConfiguration>,
    /// File handling settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

impl Configuration {
    /// Checks the limits the engine would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found, checking the formatter,
    /// linter and file sections in that order.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(formatter) = &self.formatter {
            formatter.validate()?;
        }
        if let Some(linter) = &self.linter {
            linter.validate()?;
        }
        if let Some(files) = &self.files {
            files.validate()?;
        }
        Ok(())
    }
}

/// Formatter settings shared by every language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormatterConfiguration {
    /// Whether the formatter runs at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Indentation character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_style: Option<IndentStyle>,
    /// Columns per indentation level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_width: Option<u8>,
    /// Preferred maximum line width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u16>,
    /// Line terminator written by the formatter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_ending: Option<LineEnding>,
}

impl FormatterConfiguration {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(width) = self.indent_width
            && width > MAX_INDENT_WIDTH
        {
            return Err(ConfigurationError::IndentWidth { value: width });
        }
        if let Some(width) = self.line_width
            && !(1..=MAX_LINE_WIDTH).contains(&width)
        {
            return Err(ConfigurationError::LineWidth { value: width });
        }
        Ok(())
    }
}

/// Indentation character used by the formatter.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum IndentStyle {
    /// Hard tabs.
    #[default]
    Tab,
    /// Spaces, `indent_width` per level.
    Space,
}

/// Line terminator written by the formatter.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
    /// `\r`
    Cr,
}

/// Linter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinterConfiguration {
    /// Whether lint rules run at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Rule group selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Rules>,
}

impl LinterConfiguration {
    fn validate(&self) -> Result<(), ConfigurationError> {
        match &self.rules {
            Some(Rules {
                recommended: Some(true),
                all: Some(true),
            }) => Err(ConfigurationError::ConflictingRuleSets),
            _ => Ok(()),
        }
    }
}

/// Coarse rule selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Rules {
    /// Enable the recommended rule set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<bool>,
    /// Enable every rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
}

/// JavaScript-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JavascriptConfiguration {
    /// JavaScript formatter overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<JavascriptFormatter>,
}

/// JavaScript formatter overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JavascriptFormatter {
    /// Quote character for string literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_style: Option<QuoteStyle>,
    /// Statement terminator policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semicolons: Option<Semicolons>,
}

/// Quote character for string literals.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum QuoteStyle {
    /// `"`
    #[default]
    Double,
    /// `'`
    Single,
}

/// Statement terminator policy.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Semicolons {
    /// Always terminate statements.
    #[default]
    Always,
    /// Only where automatic insertion would change meaning.
    AsNeeded,
}

/// File handling settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilesConfiguration {
    /// Largest file, in bytes, the engine will analyse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Skip files whose language the engine does not recognise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_unknown: Option<bool>,
}

impl FilesConfiguration {
    const fn validate(&self) -> Result<(), ConfigurationError> {
        match self.max_size {
            Some(0) => Err(ConfigurationError::ZeroMaxSize),
            _ => Ok(()),
        }
    }
}

/// Problems detected by [`Configuration::validate`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `formatter.lineWidth` outside the accepted range.
    #[error("line width {value} is outside 1..={max}", max = MAX_LINE_WIDTH)]
    LineWidth {
        /// Rejected value.
        value: u16,
    },
    /// `formatter.indentWidth` above the accepted maximum.
    #[error("indent width {value} exceeds {max}", max = MAX_INDENT_WIDTH)]
    IndentWidth {
        /// Rejected value.
        value: u8,
    },
    /// `linter.rules` enables both the recommended and the full rule set.
    #[error("linter rules cannot enable both 'recommended' and 'all'")]
    ConflictingRuleSets,
    /// `files.maxSize` set to zero.
    #[error("files.maxSize must be greater than zero")]
    ZeroMaxSize,
}
