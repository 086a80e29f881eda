//! Error types for the protocol codecs.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding protocol messages.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame itself could not be parsed.
    #[error("invalid frame: {message}")]
    InvalidFrame {
        /// Description of the parse failure.
        message: String,
    },

    /// A required field was missing from a record.
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// A record referenced an operation kind this decoder does not know.
    ///
    /// Individual records with unknown operations are skipped during
    /// envelope decoding; this variant surfaces only when a caller decodes
    /// a single record directly.
    #[error("unknown operation: {op}")]
    UnknownOperation {
        /// The unrecognized operation tag.
        op: String,
    },

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CodecError {
    /// Creates an invalid frame error.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an unknown operation error.
    pub fn unknown_operation(op: impl Into<String>) -> Self {
        Self::UnknownOperation { op: op.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CodecError::invalid_frame("truncated");
        assert_eq!(err.to_string(), "invalid frame: truncated");

        let err = CodecError::unknown_operation("explode");
        assert!(err.to_string().contains("explode"));
    }
}
