//! Core types used throughout the project.

use std::fmt;

/// A locale identifier such as `pl_PL`, `ru_RU` or `en`.
///
/// The original spelling is kept for display and serialization. Matching goes
/// through [`LocaleCode::normalized`], which ignores case and treats `-` and `_`
/// as the same separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleCode(String);

impl LocaleCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased code with `-` replaced by `_` (`pl-PL` → `pl_pl`).
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize_locale_code(&self.0)
    }

    /// Language part of the code (`pl_PL` → `pl`).
    #[must_use]
    pub fn language(&self) -> String {
        self.normalized().split('_').next().unwrap_or_default().to_string()
    }

    /// Returns true if both codes name the same locale after normalization.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocaleCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LocaleCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Normalize locale code (lowercase and replace - with _)
#[must_use]
pub fn normalize_locale_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Where a message is used in the UI sources.
///
/// Kept for maintenance only. Lookup never looks at locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub filename: Option<String>,
    pub line: Option<u32>,
}

impl SourceLocation {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self { filename: Some(filename.into()), line: Some(line) }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.filename, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => f.write_str(file),
            (None, Some(line)) => write!(f, "<relative>:{line}"),
            (None, None) => f.write_str("<unknown>"),
        }
    }
}

/// Translation state carried by the `type` attribute of `<translation>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    /// No `type` attribute.
    #[default]
    Finished,
    Unfinished,
    /// Kept for history; the UI element no longer requests this string.
    Vanished,
}

impl MessageStatus {
    /// Parses the `type` attribute value. `obsolete` is the pre-Qt 5 spelling
    /// of `vanished`.
    #[must_use]
    pub fn from_type_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("vanished" | "obsolete") => Some(Self::Vanished),
            Some(_) => None,
        }
    }

    /// Value written back to the `type` attribute, if any.
    #[must_use]
    pub const fn type_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Vanished messages never take part in lookup.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Vanished)
    }
}
