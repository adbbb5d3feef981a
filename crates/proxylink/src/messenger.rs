//! The messenger: validates, encodes, guards and relays envelopes.
//!
//! A send runs start to finish under the messenger's own lock:
//!
//! ```text
//! validate fields ─→ resolve endpoint ─→ encode ─→ size guard ─→ relay
//!       │                  │                           │           │
//!       ▼                  ▼                           ▼           ▼
//!     Err(..)      Dropped(NoEndpoint)     Dropped(Oversized)   Sent / Dropped
//! ```
//!
//! The lock keeps two threads from racing on which endpoint is "any
//! connected endpoint" and keeps each message's encode-and-hand-off
//! atomic with respect to other sends. Encoding happens into a buffer
//! owned by the call, so a failed send leaves nothing behind.

use std::sync::{Mutex, MutexGuard, PoisonError};

use proxylink_protocol::{Envelope, MessageSchema, ProtocolError, Value, validate_fields};
use proxylink_transport::{ChannelTransport, Endpoint, EndpointDirectory};

use crate::guard::SizeGuard;
use crate::legacy;
use crate::relay::{RelayContext, display_fields, relay, resolve_endpoint};
use crate::{DropReason, MessengerConfig, ProxyLinkError, SendOutcome};

/// Label used in logs for legacy sends, which have no message type.
const LEGACY_LABEL: &str = "<legacy>";

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a [`Messenger`].
///
/// # Example
///
/// ```rust
/// use proxylink::Messenger;
/// use proxylink_transport::LoopbackTransport;
///
/// let (transport, _deliveries) = LoopbackTransport::new();
/// let messenger = Messenger::builder()
///     .origin_name("lobby-1")
///     .debug(true)
///     .build(transport.clone(), transport);
///
/// assert_eq!(messenger.config().origin_name, "lobby-1");
/// assert_eq!(messenger.size_limit(), 30_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessengerBuilder {
    config: MessengerConfig,
}

impl MessengerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: MessengerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the name written into every envelope's origin field.
    pub fn origin_name(mut self, name: &str) -> Self {
        self.config.origin_name = name.to_string();
        self
    }

    /// Sets the platform channel envelopes ride on.
    pub fn transport_channel(mut self, channel: &str) -> Self {
        self.config.transport_channel = channel.to_string();
        self
    }

    /// Sets the size guard's ceiling.
    pub fn size_limit(mut self, limit: usize) -> Self {
        self.config.size_limit = limit;
        self
    }

    /// Enables per-send debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Builds the messenger over a transport and an endpoint directory.
    ///
    /// The size limit is clamped to the transport's hard cap.
    pub fn build<T, D>(self, transport: T, directory: D) -> Messenger<T, D>
    where
        T: ChannelTransport,
        D: EndpointDirectory,
    {
        let limit = self.config.effective_size_limit(transport.max_payload());
        Messenger {
            transport,
            directory,
            guard: SizeGuard::new(limit),
            config: self.config,
            send_lock: Mutex::new(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Messenger
// ---------------------------------------------------------------------------

/// Sends typed envelopes (and legacy primitive payloads) to the proxy.
///
/// The messenger owns everything one send needs: the transport that
/// carries the bytes, the directory that says who is connected, the size
/// guard, and the lock that serializes sends. It is generic over the
/// first two so tests and the demo can plug in [`LoopbackTransport`]
/// while a real server plugs in the platform's channel API.
///
/// ## What a send can return
///
/// There are two very different ways a send "doesn't happen":
///
/// - **The caller got it wrong.** Wrong number of fields, a field of the
///   wrong kind, a non-primitive in a legacy payload. These come back as
///   `Err` before a single byte is written. They are bugs in the calling
///   code and should be fixed there.
/// - **The world got in the way.** Nobody is online, the message is too
///   big, the channel isn't registered. These come back as
///   `Ok(SendOutcome::Dropped(..))` with a warning in the log. The game
///   loop keeps running; the message is simply lost, which is fine for a
///   fire-and-forget protocol.
///
/// ## Threads
///
/// `Messenger` is `Sync`: share it behind an `Arc` and call
/// [`send`](Self::send) from any thread. Sends never block on I/O; the
/// lock is only held for the encode-and-hand-off of one message, so two
/// messages sent from one thread reach the transport in call order.
///
/// [`LoopbackTransport`]: proxylink_transport::LoopbackTransport
pub struct Messenger<T, D> {
    transport: T,
    directory: D,
    guard: SizeGuard,
    config: MessengerConfig,
    send_lock: Mutex<()>,
}

impl Messenger<(), ()> {
    /// Creates a new builder.
    ///
    /// The transport and directory types are fixed later, by
    /// [`MessengerBuilder::build`].
    pub fn builder() -> MessengerBuilder {
        MessengerBuilder::new()
    }
}

impl<T, D> Messenger<T, D>
where
    T: ChannelTransport,
    D: EndpointDirectory,
{

    /// Sends one schema-validated envelope on a logical channel.
    ///
    /// `sender` picks the endpoint to relay through; `None` uses any
    /// connected endpoint.
    ///
    /// # Returns
    /// - `Ok(Sent)` once the bytes are handed to the transport.
    /// - `Ok(Dropped(..))` when there's no endpoint, the message is too
    ///   large, or the transport refused it. A warning is logged.
    ///
    /// # Errors
    /// - [`ProtocolError::ArityMismatch`](proxylink_protocol::ProtocolError::ArityMismatch)
    ///   or [`ProtocolError::KindMismatch`](proxylink_protocol::ProtocolError::KindMismatch)
    ///   when `fields` doesn't match the schema. Nothing is written.
    /// - An encoding error such as a JSON failure. A text field too long
    ///   for its length prefix is not an error: the message is dropped
    ///   as `Oversized`.
    /// - An unexpected transport failure.
    pub fn send<S: MessageSchema>(
        &self,
        sender: Option<&Endpoint>,
        channel: &str,
        message_type: S,
        fields: &[Value],
    ) -> Result<SendOutcome, ProxyLinkError> {
        let _guard = self.lock();

        validate_fields(&message_type, fields)?;

        if self.config.debug {
            tracing::debug!(
                message_type = message_type.name(),
                channel,
                fields = %display_fields(fields),
                "sending"
            );
        }

        let Some(endpoint) = resolve_endpoint(sender, &self.directory) else {
            tracing::warn!(
                message_type = message_type.name(),
                "no players online, message not sent"
            );
            return Ok(SendOutcome::Dropped(DropReason::NoEndpoint));
        };

        let envelope = Envelope {
            channel,
            sender: endpoint.id.into_inner(),
            origin: &self.config.origin_name,
            message_type,
            fields,
        };
        let data = match envelope.encode() {
            Ok(data) => data,
            Err(ProtocolError::TextTooLong { len, .. }) => {
                return Ok(self.drop_oversized_field(message_type.name(), len));
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    message_type = message_type.name(),
                    channel,
                    fields = %display_fields(fields),
                    "failed to encode envelope"
                );
                return Err(e.into());
            }
        };

        let ctx = RelayContext {
            message_type: message_type.name(),
            logical_channel: channel,
            fields,
        };
        self.guard_and_relay(&endpoint, &data, &ctx)
    }

    /// Sends a bare sequence of primitives, with no header, on the
    /// transport channel.
    ///
    /// # Errors
    /// - [`ProxyLinkError::EmptyLegacyPayload`] for no fields.
    /// - [`ProxyLinkError::UnsupportedLegacyKind`] ("unknown type of
    ///   data") for anything but `Int32`, `Float64`, `Bool`, `Text`.
    /// - An unexpected transport failure.
    pub fn send_legacy(
        &self,
        sender: Option<&Endpoint>,
        fields: &[Value],
    ) -> Result<SendOutcome, ProxyLinkError> {
        let _guard = self.lock();

        legacy::validate(fields)?;

        if self.config.debug {
            tracing::debug!(fields = %display_fields(fields), "sending legacy");
        }

        let Some(endpoint) = resolve_endpoint(sender, &self.directory) else {
            tracing::warn!(
                message_type = LEGACY_LABEL,
                "no players online, message not sent"
            );
            return Ok(SendOutcome::Dropped(DropReason::NoEndpoint));
        };

        let data = match legacy::encode(fields) {
            Ok(data) => data,
            Err(ProxyLinkError::Protocol(ProtocolError::TextTooLong { len, .. })) => {
                return Ok(self.drop_oversized_field(LEGACY_LABEL, len));
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    message_type = LEGACY_LABEL,
                    channel = %self.config.transport_channel,
                    fields = %display_fields(fields),
                    "failed to encode legacy payload"
                );
                return Err(e);
            }
        };

        let ctx = RelayContext {
            message_type: LEGACY_LABEL,
            logical_channel: &self.config.transport_channel,
            fields,
        };
        self.guard_and_relay(&endpoint, &data, &ctx)
    }

    /// A single text field too long for its 16-bit prefix.
    ///
    /// `len` alone is past any limit the guard can hold, so the whole
    /// message is dropped the same way the guard would drop it.
    fn drop_oversized_field(&self, message_type: &str, len: usize) -> SendOutcome {
        tracing::warn!(
            message_type,
            size = len,
            limit = self.guard.limit(),
            "message too large, not sent"
        );
        SendOutcome::Dropped(DropReason::Oversized {
            size: len,
            limit: self.guard.limit(),
        })
    }

    /// Size guard, then hand-off. Must be called with the lock held.
    fn guard_and_relay(
        &self,
        endpoint: &Endpoint,
        data: &[u8],
        ctx: &RelayContext<'_>,
    ) -> Result<SendOutcome, ProxyLinkError> {
        if let Err(reason) = self.guard.check(data.len()) {
            tracing::warn!(
                message_type = ctx.message_type,
                size = data.len(),
                limit = self.guard.limit(),
                "message too large, not sent"
            );
            return Ok(SendOutcome::Dropped(reason));
        }

        relay(
            &self.transport,
            endpoint,
            &self.config.transport_channel,
            data,
            ctx,
        )
    }

    /// The guarded state is `()`, so a panic in another send can't leave
    /// it inconsistent; recover from poisoning.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.send_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &MessengerConfig {
        &self.config
    }

    /// The size limit actually enforced.
    pub fn size_limit(&self) -> usize {
        self.guard.limit()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }
}

// =========================================================================
// Tests
// =========================================================================
