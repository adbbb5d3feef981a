//! Error types for the protocol layer.
//!
//! Everything here is either a schema violation caught before a single
//! byte is written, or a malformed buffer caught while reading. Both are
//! programming errors on one side of the channel, so they propagate.

use crate::Kind;

/// Errors that can occur while encoding or decoding envelopes.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The caller supplied a different number of fields than the
    /// message type's schema declares.
    #[error(
        "{message_type} expects {expected} fields but {actual} were given"
    )]
    ArityMismatch {
        /// Name of the message type being sent.
        message_type: &'static str,
        /// Field count declared by the schema.
        expected: usize,
        /// Field count the caller supplied.
        actual: usize,
    },

    /// A field's runtime kind doesn't match the schema at its position.
    #[error(
        "{message_type} field #{position} must be {expected}, got {actual}"
    )]
    KindMismatch {
        /// Name of the message type being sent.
        message_type: &'static str,
        /// Zero-based position of the offending field.
        position: usize,
        /// Kind the schema declares at this position.
        expected: Kind,
        /// Kind of the value the caller supplied.
        actual: Kind,
    },

    /// A schema declares raw bytes anywhere but in the last position.
    /// Raw bytes consume the rest of the buffer, so nothing can follow.
    #[error("{message_type} declares raw bytes at #{position}, before the last field")]
    RawBytesNotLast {
        /// Name of the offending message type.
        message_type: &'static str,
        /// Position of the misplaced raw-bytes entry.
        position: usize,
    },

    /// Bytes were left over after the last field of a message type
    /// that doesn't end in raw bytes.
    #[error("{message_type} has {count} trailing bytes after its last field")]
    TrailingBytes {
        /// Name of the message type being decoded.
        message_type: &'static str,
        /// Number of unread bytes.
        count: usize,
    },

    /// A string doesn't fit under the 16-bit length prefix.
    #[error("text too long: {len} bytes (max {max})")]
    TextTooLong {
        /// Encoded UTF-8 length of the string.
        len: usize,
        /// Largest length the prefix can address.
        max: usize,
    },

    /// The buffer ended before a field was fully read.
    #[error("unexpected end of data: need {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the field needs.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A text field isn't valid UTF-8.
    #[error("text field is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An identifier field isn't a canonical UUID string.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A message type name doesn't belong to the registry.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// An enum-name field doesn't match any constant of the enumeration.
    #[error("{name} is not a constant of {enumeration}")]
    UnknownEnumName {
        /// The name that was read.
        name: String,
        /// The enumeration it was resolved against.
        enumeration: &'static str,
    },

    /// A structured-map or rich-text field failed JSON (de)serialization.
    #[error("json field failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Compressing or inflating a compressed-text field failed.
    #[error("compression failed: {0}")]
    Compression(#[source] std::io::Error),

    /// A compressed-text field isn't valid Base64.
    #[error("compressed text is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
