//! What happened to a send that didn't fail.

use std::fmt;

use proxylink_transport::EndpointId;

/// Result of a send that raised no programming error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The bytes were handed to the transport.
    Sent {
        /// The endpoint they rode on.
        endpoint: EndpointId,
        /// Encoded size of the message.
        bytes: usize,
    },
    /// The message was dropped and a warning was logged.
    Dropped(DropReason),
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Why a message never reached the transport (or was refused by it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// No endpoint was connected and none was supplied.
    NoEndpoint,
    /// The size guard rejected the encoded message.
    Oversized { size: usize, limit: usize },
    /// The transport channel isn't registered for outgoing messages.
    ChannelNotRegistered { channel: String },
    /// The transport's own hard cap rejected the bytes.
    TransportOversized { size: usize, max: usize },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEndpoint => write!(f, "no players online"),
            Self::Oversized { size, limit } => {
                write!(f, "{size} bytes reaches the {limit} byte limit")
            }
            Self::ChannelNotRegistered { channel } => {
                write!(f, "channel {channel} is not registered")
            }
            Self::TransportOversized { size, max } => {
                write!(f, "transport refused {size} bytes (max {max})")
            }
        }
    }
}
