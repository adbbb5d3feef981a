use crate::EndpointId;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The channel has not been registered for outgoing traffic on this
    /// process.
    #[error("channel {channel} is not registered for outgoing messages")]
    ChannelNotRegistered {
        /// The channel the send was attempted on.
        channel: String,
    },

    /// The payload exceeds the transport's hard per-message ceiling.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Actual payload size in bytes.
        size: usize,
        /// The transport's hard cap.
        max: usize,
    },

    /// The endpoint disconnected before (or while) the bytes were handed off.
    #[error("endpoint {0} is no longer connected")]
    EndpointGone(EndpointId),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),
}
