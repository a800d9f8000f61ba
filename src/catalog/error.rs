use std::path::PathBuf;

use thiserror::Error;

use crate::types::LocaleCode;

/// Errors raised while loading, resolving or writing a catalog.
///
/// A missing translation is not an error: lookups fall back to the source text.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The document is not a usable `.ts` catalog. Nothing of it is kept.
    #[error("Malformed catalog{}{}: {reason}", display_path(.path), display_line(.line))]
    Malformed {
        /// File the catalog came from, when loaded from disk
        path: Option<PathBuf>,
        /// 1-based line of the offending element
        line: Option<u64>,
        reason: String,
    },
    /// No catalog is registered for the requested locale
    #[error("Unknown locale: {0}")]
    UnknownLocale(LocaleCode),
    /// The catalog file could not be read
    #[error("Failed to read catalog file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Serializing the catalog failed
    #[error("Failed to write catalog: {0}")]
    Write(#[from] xml::writer::Error),
}

impl CatalogError {
    pub(crate) fn malformed(line: Option<u64>, reason: impl Into<String>) -> Self {
        Self::Malformed { path: None, line, reason: reason.into() }
    }

    /// Attaches the source file to a `Malformed` error.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            Self::Malformed { path: None, line, reason } => {
                Self::Malformed { path: Some(file.into()), line, reason }
            }
            other => other,
        }
    }

    /// True for errors caused by the catalog content itself.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// ` '<path>'` suffix, or nothing
#[allow(clippy::ref_option)]
fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref().map_or_else(String::new, |p| format!(" '{}'", p.display()))
}

/// ` at line <n>` suffix, or nothing
#[allow(clippy::ref_option)]
fn display_line(line: &Option<u64>) -> String {
    line.map_or_else(String::new, |l| format!(" at line {l}"))
}
