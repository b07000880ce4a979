//! Error types for gitstrata-core

use std::fmt;

/// Result type alias for gitstrata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gitstrata operations
#[derive(Debug)]
pub enum Error {
    /// Git subprocess error (spawn failure, unexpected non-zero exit)
    Git(String),

    /// Commit metadata from `git show` could not be decoded
    CommitLogParse(String),

    /// One or more roster repositories could not be inspected at all
    Setup(Vec<String>),

    /// Invalid configuration
    Config(String),

    /// I/O error
    Io(std::io::Error),

    /// Structural-parser collaborator failure
    Metric(String),

    /// Report artifact could not be written
    Report(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Git(msg) => write!(f, "Git error: {}", msg),
            Error::CommitLogParse(msg) => write!(f, "Commit log parse error: {}", msg),
            Error::Setup(repos) => write!(
                f,
                "Setup error: could not inspect repositories: {}",
                repos.join(", ")
            ),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Metric(msg) => write!(f, "Metric error: {}", msg),
            Error::Report(msg) => write!(f, "Report error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Error::Git(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Git subprocess error
    Git,
    /// Commit metadata decoding error
    CommitLogParse,
    /// Roster inspection error
    Setup,
    /// Configuration error
    Config,
    /// I/O operation error
    Io,
    /// Structural-parser collaborator failure
    Metric,
    /// Report writing error
    Report,
}

impl Error {
    /// Get the error kind — zero allocation, returns a Copy enum.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Git(_) => ErrorKind::Git,
            Error::CommitLogParse(_) => ErrorKind::CommitLogParse,
            Error::Setup(_) => ErrorKind::Setup,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
            Error::Metric(_) => ErrorKind::Metric,
            Error::Report(_) => ErrorKind::Report,
        }
    }
}
