//! Error types module
//!
//! All failures an upload test can run into are unified under [`UploadError`]:
//! local file access, transport, unexpected status, and malformed responses.
//! The enum carries no HTTP client types so it can be shared by every crate.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures caused by the remote side
    Warn,
    /// Error level - for local or unexpected failures
    Error,
}

/// Transport failure classes, as reported by the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Other,
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TransportErrorKind::Connect => write!(f, "connection failed"),
            TransportErrorKind::Timeout => write!(f, "request timed out"),
            TransportErrorKind::Other => write!(f, "request failed"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to open file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{kind}: {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Malformed response (status {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },
}

pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        UploadError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Machine-readable error code (e.g., "TRANSPORT_TIMEOUT")
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::InvalidConfig(_) => "INVALID_CONFIG",
            UploadError::FileAccess { .. } => "FILE_ACCESS",
            UploadError::Transport { kind, .. } => match kind {
                TransportErrorKind::Connect => "TRANSPORT_CONNECT",
                TransportErrorKind::Timeout => "TRANSPORT_TIMEOUT",
                TransportErrorKind::Other => "TRANSPORT_ERROR",
            },
            UploadError::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            UploadError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
        }
    }

    /// Whether running the same test again could plausibly succeed.
    /// Nothing retries automatically; this only informs the log line.
    pub fn is_recoverable(&self) -> bool {
        match self {
            UploadError::Transport { .. } => true,
            UploadError::UnexpectedStatus { status, .. } => *status >= 500,
            UploadError::InvalidConfig(_)
            | UploadError::FileAccess { .. }
            | UploadError::MalformedResponse { .. } => false,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            UploadError::InvalidConfig(_) => LogLevel::Debug,
            UploadError::Transport { .. } | UploadError::UnexpectedStatus { .. } => LogLevel::Warn,
            UploadError::FileAccess { .. } | UploadError::MalformedResponse { .. } => {
                LogLevel::Error
            }
        }
    }
}
