//! Unified error type for proxylink.

use proxylink_protocol::{Kind, ProtocolError};
use proxylink_transport::TransportError;

/// Top-level error that wraps the layer errors.
///
/// Only programming errors end up here: schema violations, unsupported
/// kinds, and transport failures nobody planned for. Operational drops
/// (no endpoint, oversize, unregistered channel) are reported through
/// [`SendOutcome`](crate::SendOutcome) instead.
#[derive(Debug, thiserror::Error)]
pub enum ProxyLinkError {
    /// An unexpected transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A schema violation or encoding failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The legacy format only carries `Int32`, `Float64`, `Bool`, `Text`.
    #[error("unknown type of data at position {position}: {kind}")]
    UnsupportedLegacyKind {
        /// Zero-based position of the offending field.
        position: usize,
        /// The kind that was supplied.
        kind: Kind,
    },

    /// A legacy message was sent with no fields.
    #[error("legacy message needs at least one field")]
    EmptyLegacyPayload,
}
