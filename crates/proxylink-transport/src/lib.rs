//! Plugin-channel transport abstraction for proxylink.
//!
//! The hosting platform only guarantees one thing: an opaque byte array,
//! sent on a named channel, through a connected endpoint, arrives at the
//! other process. This crate models that collaborator with two traits:
//!
//! - [`ChannelTransport`] registers channels and hands bytes off.
//! - [`EndpointDirectory`] enumerates the endpoints bytes can flow through.
//!
//! # Feature Flags
//!
//! - `loopback` (default): an in-process [`LoopbackTransport`] that
//!   delivers through a Tokio channel. Used by tests and the demo.

mod error;
#[cfg(feature = "loopback")]
mod loopback;

pub use error::TransportError;
#[cfg(feature = "loopback")]
pub use loopback::{Delivery, LoopbackTransport};

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// The transport's hard per-message ceiling in bytes.
pub const MAX_PAYLOAD_SIZE: usize = 32_766;

/// The channel every proxy-bound plugin message travels on.
pub const DEFAULT_CHANNEL: &str = "BungeeCord";

/// Unique identity of a connected endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointId(Uuid);

impl EndpointId {
    /// Creates a new `EndpointId` from a UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Creates a fresh random identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn into_inner(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A connected session through which channel bytes actually flow.
///
/// On a game server this is a player connection: the proxy only sees
/// plugin messages that ride on some player's connection, so at least
/// one must exist to send anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Unique identity, written into every envelope header.
    pub id: EndpointId,
    /// Display name, used in logs only.
    pub name: String,
}

impl Endpoint {
    /// Creates an endpoint with the given identity and name.
    pub fn new(id: EndpointId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Which way a channel registration points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// This process may send on the channel.
    Outgoing,
    /// This process listens on the channel.
    Incoming,
}

/// Hands finished byte buffers to the hosting platform.
///
/// Implementations must not block: the platform either writes the bytes
/// immediately or queues them for an I/O thread.
pub trait ChannelTransport: Send + Sync + 'static {
    /// Returns `true` if `channel` is registered in the given direction.
    fn is_registered(&self, channel: &str, direction: Direction) -> bool;

    /// Sends `data` on `channel` through `endpoint`.
    ///
    /// # Errors
    /// - [`TransportError::ChannelNotRegistered`] if the outgoing channel
    ///   was never registered.
    /// - [`TransportError::PayloadTooLarge`] if `data` exceeds
    ///   [`max_payload`](Self::max_payload).
    fn send(
        &self,
        endpoint: &Endpoint,
        channel: &str,
        data: &[u8],
    ) -> Result<(), TransportError>;

    /// The hard per-message ceiling this transport enforces.
    fn max_payload(&self) -> usize {
        MAX_PAYLOAD_SIZE
    }
}

/// Lists the endpoints currently connected to this process.
pub trait EndpointDirectory: Send + Sync + 'static {
    /// Returns every currently connected endpoint.
    fn connected(&self) -> Vec<Endpoint>;

    /// Returns an arbitrary connected endpoint, if any.
    fn any_connected(&self) -> Option<Endpoint> {
        self.connected().into_iter().next()
    }
}

impl<T: ChannelTransport> ChannelTransport for Arc<T> {
    fn is_registered(&self, channel: &str, direction: Direction) -> bool {
        (**self).is_registered(channel, direction)
    }

    fn send(
        &self,
        endpoint: &Endpoint,
        channel: &str,
        data: &[u8],
    ) -> Result<(), TransportError> {
        (**self).send(endpoint, channel, data)
    }

    fn max_payload(&self) -> usize {
        (**self).max_payload()
    }
}

impl<T: EndpointDirectory> EndpointDirectory for Arc<T> {
    fn connected(&self) -> Vec<Endpoint> {
        (**self).connected()
    }

    fn any_connected(&self) -> Option<Endpoint> {
        (**self).any_connected()
    }
}
