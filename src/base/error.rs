//! Error types for conversion operations.

use thiserror::Error;

/// Errors that can occur while parsing, compiling or writing.
///
/// `Xml` and `Schema` messages are shown to the user verbatim; everything
/// else is logged and reported as a blank failure.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Malformed XML input.
    #[error("{0}")]
    Xml(String),

    /// Schema failed structural validation or compilation.
    #[error("{0}")]
    Schema(String),

    /// The cancellation token was signalled at a checkpoint.
    #[error("conversion cancelled")]
    Cancelled,

    /// Serializer failure.
    #[error("write error: {0}")]
    Write(String),

    /// Serialized output was not valid UTF-8.
    #[error("invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Broken internal invariant.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a write error.
    pub fn write(message: impl std::fmt::Display) -> Self {
        Self::Write(message.to_string())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the message is meant for the user.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Xml(_) | Self::Schema(_))
    }
}
