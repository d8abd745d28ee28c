//! Crate error types.
//!
//! [`Error`] is what the public API returns. Parse failures carry their own
//! positioned [`ParseError`](crate::dsl::parser::ParseError); property
//! failures are [`PropertyError`]s so realization can collect them as
//! diagnostics instead of aborting.

use crate::dsl::parser::ParseError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the runtime.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed view-description source.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// An assignment named an unknown tag or carried an incompatible value.
    #[error(transparent)]
    Property(#[from] PropertyError),
    /// A node names a kind the factory does not know.
    #[error("unknown view kind \"{0}\"")]
    UnknownKind(String),
    /// An identifier or handle did not resolve to a live view.
    #[error("view not found: {0}")]
    ViewNotFound(String),
    /// A structural tree operation would break the single-parent invariant.
    #[error("invalid tree operation: {0}")]
    InvalidTreeOperation(String),
    /// A resource could not be loaded (or the load was cancelled).
    #[error("resource \"{name}\" failed to load: {reason}")]
    ResourceLoad { name: String, reason: String },
    /// The session has finished or was never started.
    #[error("session {0} is closed")]
    SessionClosed(u64),
    /// Startup configuration was rejected.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Recoverable property-assignment failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("\"{tag}\" is not a property of {kind}")]
    UnknownTag { kind: String, tag: String },
    #[error("invalid value for \"{tag}\": {message}")]
    TypeMismatch { tag: String, message: String },
}

impl PropertyError {
    /// Build a type-mismatch error.
    pub fn mismatch(tag: impl Into<String>, message: impl Into<String>) -> Self {
        PropertyError::TypeMismatch {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// The offending property tag.
    pub fn tag(&self) -> &str {
        match self {
            PropertyError::UnknownTag { tag, .. } | PropertyError::TypeMismatch { tag, .. } => tag,
        }
    }
}

/// Failure to read a scalar value from its textual form (`"20%"`, `"#ff0000"`).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot read {expected} from \"{text}\"")]
pub struct ValueParseError {
    pub expected: &'static str,
    pub text: String,
}

impl ValueParseError {
    pub(crate) fn new(expected: &'static str, text: &str) -> Self {
        Self {
            expected,
            text: text.to_owned(),
        }
    }
}
