//! In-process transport that delivers through a Tokio channel.
//!
//! Stands in for the hosting platform during tests and demos. It keeps
//! the platform's rules: sends need an outgoing registration, a
//! connected endpoint, and must fit under the hard size cap.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::{
    ChannelTransport, Direction, Endpoint, EndpointDirectory, EndpointId,
    MAX_PAYLOAD_SIZE, TransportError,
};

/// One byte array handed to the loopback transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The endpoint the bytes rode on.
    pub endpoint: EndpointId,
    /// The transport channel they were sent on.
    pub channel: String,
    /// The raw payload.
    pub data: Vec<u8>,
}

struct Inner {
    registrations: Mutex<HashSet<(String, Direction)>>,
    endpoints: Mutex<Vec<Endpoint>>,
    tx: mpsc::UnboundedSender<Delivery>,
    max_payload: usize,
    handed_off: AtomicU64,
}

/// A [`ChannelTransport`] + [`EndpointDirectory`] living in this process.
///
/// Cloning is cheap and every clone shares the same registrations,
/// endpoints and delivery queue.
#[derive(Clone)]
pub struct LoopbackTransport {
    inner: Arc<Inner>,
}

impl LoopbackTransport {
    /// Creates a transport with the platform's default hard cap.
    ///
    /// Returns the receiving half alongside; every successful send
    /// shows up there as a [`Delivery`].
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        Self::with_max_payload(MAX_PAYLOAD_SIZE)
    }

    /// Creates a transport with a custom hard cap.
    pub fn with_max_payload(
        max_payload: usize,
    ) -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            inner: Arc::new(Inner {
                registrations: Mutex::new(HashSet::new()),
                endpoints: Mutex::new(Vec::new()),
                tx,
                max_payload,
                handed_off: AtomicU64::new(0),
            }),
        };
        (transport, rx)
    }

    /// Registers `channel` in one direction.
    pub fn register(&self, channel: &str, direction: Direction) {
        lock(&self.inner.registrations).insert((channel.to_string(), direction));
        tracing::debug!(channel, ?direction, "channel registered");
    }

    /// Registers `channel` for both sending and receiving.
    pub fn register_both(&self, channel: &str) {
        self.register(channel, Direction::Outgoing);
        self.register(channel, Direction::Incoming);
    }

    /// Removes a registration. Returns `true` if it existed.
    pub fn unregister(&self, channel: &str, direction: Direction) -> bool {
        lock(&self.inner.registrations).remove(&(channel.to_string(), direction))
    }

    /// Connects a new endpoint with a random identity.
    pub fn connect(&self, name: &str) -> Endpoint {
        let endpoint = Endpoint::new(EndpointId::random(), name);
        lock(&self.inner.endpoints).push(endpoint.clone());
        tracing::debug!(%endpoint, "endpoint connected");
        endpoint
    }

    /// Disconnects an endpoint. Returns `true` if it was connected.
    pub fn disconnect(&self, id: EndpointId) -> bool {
        let mut endpoints = lock(&self.inner.endpoints);
        let before = endpoints.len();
        endpoints.retain(|e| e.id != id);
        before != endpoints.len()
    }

    /// Number of byte arrays successfully handed off so far.
    pub fn handed_off(&self) -> u64 {
        self.inner.handed_off.load(Ordering::Relaxed)
    }
}

impl ChannelTransport for LoopbackTransport {
    fn is_registered(&self, channel: &str, direction: Direction) -> bool {
        lock(&self.inner.registrations).contains(&(channel.to_string(), direction))
    }

    fn send(
        &self,
        endpoint: &Endpoint,
        channel: &str,
        data: &[u8],
    ) -> Result<(), TransportError> {
        if !self.is_registered(channel, Direction::Outgoing) {
            return Err(TransportError::ChannelNotRegistered {
                channel: channel.to_string(),
            });
        }
        if data.len() > self.inner.max_payload {
            return Err(TransportError::PayloadTooLarge {
                size: data.len(),
                max: self.inner.max_payload,
            });
        }
        if !lock(&self.inner.endpoints).iter().any(|e| e.id == endpoint.id) {
            return Err(TransportError::EndpointGone(endpoint.id));
        }

        self.inner
            .tx
            .send(Delivery {
                endpoint: endpoint.id,
                channel: channel.to_string(),
                data: data.to_vec(),
            })
            .map_err(|_| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "loopback receiver dropped",
                ))
            })?;

        self.inner.handed_off.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(%endpoint, channel, size = data.len(), "handed off");
        Ok(())
    }

    fn max_payload(&self) -> usize {
        self.inner.max_payload
    }
}

impl EndpointDirectory for LoopbackTransport {
    fn connected(&self) -> Vec<Endpoint> {
        lock(&self.inner.endpoints).clone()
    }

    fn any_connected(&self) -> Option<Endpoint> {
        lock(&self.inner.endpoints).first().cloned()
    }
}

/// The guarded collections stay consistent across a panic, so a
/// poisoned lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
