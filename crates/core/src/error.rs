//! Store error model.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the identity store.
pub type StoreResult<T> = Result<T, StoreError>;

/// Which record set a parse failure came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecordSource {
    Users,
    Roles,
}

impl core::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RecordSource::Users => f.write_str("users"),
            RecordSource::Roles => f.write_str("roles"),
        }
    }
}

/// Failure to build an identity store snapshot.
///
/// Every variant aborts snapshot construction. A partially parsed store is
/// never published, since a skipped record is a silent gap in access control.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record line was malformed (1-based line number).
    #[error("{source_kind} line {line}: {reason}")]
    Parse {
        source_kind: RecordSource,
        line: usize,
        reason: String,
    },

    /// A backing file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn parse(source_kind: RecordSource, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            source_kind,
            line,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Line number of a parse failure, if this is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            StoreError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}
