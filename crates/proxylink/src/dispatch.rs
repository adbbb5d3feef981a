//! Receiving side: routes inbound envelopes to channel listeners.
//!
//! The dispatcher only splits the header off and routes on its logical
//! channel. Decoding the body is the listener's job, since only the
//! listener knows which registry its channel uses:
//!
//! ```rust
//! use proxylink::Dispatcher;
//! use proxylink_protocol::{IncomingMessage, ProxyMessage};
//!
//! let mut dispatcher = Dispatcher::new("BungeeCord");
//! dispatcher.register("proxylink:main", |message: &IncomingMessage| {
//!     if let Ok((kind, fields)) = message.decode_fields::<ProxyMessage>() {
//!         println!("{kind} from {}: {} fields", message.header.origin, fields.len());
//!     }
//! });
//! ```

use std::collections::HashMap;

use proxylink_protocol::IncomingMessage;
use proxylink_transport::Delivery;
use tokio::sync::mpsc;

/// Receives every envelope addressed to one logical channel.
pub trait ChannelListener: Send + Sync + 'static {
    fn on_message(&self, message: &IncomingMessage);
}

impl<F> ChannelListener for F
where
    F: Fn(&IncomingMessage) + Send + Sync + 'static,
{
    fn on_message(&self, message: &IncomingMessage) {
        self(message)
    }
}

/// Routes raw byte arrays to listeners by their header's channel.
pub struct Dispatcher {
    transport_channel: String,
    listeners: HashMap<String, Vec<Box<dyn ChannelListener>>>,
}

impl Dispatcher {
    /// Creates a dispatcher for envelopes arriving on `transport_channel`.
    pub fn new(transport_channel: &str) -> Self {
        Self {
            transport_channel: transport_channel.to_string(),
            listeners: HashMap::new(),
        }
    }

    /// Registers interest in a logical channel. Several listeners may
    /// share one channel; they run in registration order.
    pub fn register(&mut self, channel: &str, listener: impl ChannelListener) {
        self.listeners
            .entry(channel.to_string())
            .or_default()
            .push(Box::new(listener));
        tracing::info!(channel, "listener registered");
    }

    /// Returns `true` if at least one listener watches `channel`.
    pub fn is_listening(&self, channel: &str) -> bool {
        self.listeners.contains_key(channel)
    }

    /// Routes one raw byte array.
    ///
    /// Returns `true` if a listener received it. Malformed headers and
    /// channels nobody listens on are logged at debug and ignored.
    pub fn dispatch(&self, data: &[u8]) -> bool {
        let message = match IncomingMessage::decode(data) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, size = data.len(), "failed to decode envelope header");
                return false;
            }
        };

        let Some(listeners) = self.listeners.get(&message.header.channel) else {
            tracing::debug!(
                channel = %message.header.channel,
                message_type = %message.header.message_type,
                "no listener for channel"
            );
            return false;
        };

        for listener in listeners {
            listener.on_message(&message);
        }
        true
    }

    /// Drains deliveries until every sender is gone.
    ///
    /// Deliveries on other transport channels are skipped. Returns the
    /// number of envelopes that reached a listener.
    pub async fn run(self, mut deliveries: mpsc::UnboundedReceiver<Delivery>) -> usize {
        tracing::info!(channel = %self.transport_channel, "dispatcher running");
        let mut dispatched = 0;

        while let Some(delivery) = deliveries.recv().await {
            if delivery.channel != self.transport_channel {
                tracing::trace!(channel = %delivery.channel, "skipping foreign channel");
                continue;
            }
            if self.dispatch(&delivery.data) {
                dispatched += 1;
            }
        }

        tracing::info!(dispatched, "dispatcher stopped");
        dispatched
    }
}
