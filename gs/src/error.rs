//! Error types for decoding, persistence and range removal

use std::path::PathBuf;
use thiserror::Error;

/// Why a fragment of point text could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseReason {
    /// Fewer than four `:`-separated fields after the tag
    #[error("expected 4 fields (name:x:y:z), found {found}")]
    MissingFields { found: usize },

    #[error("point name is empty")]
    EmptyName,

    /// The name contains the field delimiter or a line break
    #[error("point name contains ':' or a line break")]
    InvalidName,

    /// A coordinate is not a number, or is NaN/infinite
    #[error("{axis} coordinate '{value}' is not a finite number")]
    InvalidNumber { axis: char, value: String },
}

/// Malformed point text
///
/// Carries the raw fragment verbatim so callers can echo it back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Not a valid GPS point ({reason}): {fragment}")]
pub struct ParseError {
    pub fragment: String,
    pub reason: ParseReason,
}

impl ParseError {
    pub fn new(fragment: impl Into<String>, reason: ParseReason) -> Self {
        Self {
            fragment: fragment.into(),
            reason,
        }
    }
}

/// Errors raised while reading or writing a point store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("Invalid server or channel id: '{0}'")]
    InvalidKey(String),

    #[error("Malformed bindings file {path}: {source}")]
    Bindings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error comes from corrupt stored text rather than the filesystem
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Bindings { .. })
    }
}

/// Rejected index range for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid index range: {start} to {end} (collection has {len} points)")]
pub struct RangeError {
    pub start: usize,
    pub end: usize,
    pub len: usize,
}
