//! The transport relay: picks an endpoint and hands bytes off.
//!
//! Plugin messages can only ride on an established connection, so a
//! send needs an endpoint. The relay also turns the two failures the
//! platform is known to raise into warnings and drops.

use proxylink_protocol::Value;
use proxylink_transport::{
    ChannelTransport, Direction, Endpoint, EndpointDirectory, TransportError,
};

use crate::{DropReason, ProxyLinkError, SendOutcome};

/// Picks the endpoint a message rides on: the explicit one if given,
/// otherwise any connected endpoint.
pub(crate) fn resolve_endpoint<D: EndpointDirectory>(
    explicit: Option<&Endpoint>,
    directory: &D,
) -> Option<Endpoint> {
    match explicit {
        Some(endpoint) => Some(endpoint.clone()),
        None => directory.any_connected(),
    }
}

/// What's being relayed, for log context.
pub(crate) struct RelayContext<'a> {
    pub(crate) message_type: &'a str,
    pub(crate) logical_channel: &'a str,
    pub(crate) fields: &'a [Value],
}

/// Hands `data` to the transport on `transport_channel`.
///
/// # Errors
/// Any transport failure other than an unregistered channel or an
/// oversized payload is logged with full context and returned.
pub(crate) fn relay<T: ChannelTransport>(
    transport: &T,
    endpoint: &Endpoint,
    transport_channel: &str,
    data: &[u8],
    ctx: &RelayContext<'_>,
) -> Result<SendOutcome, ProxyLinkError> {
    match transport.send(endpoint, transport_channel, data) {
        Ok(()) => {
            tracing::trace!(
                message_type = ctx.message_type,
                %endpoint,
                size = data.len(),
                "relayed"
            );
            Ok(SendOutcome::Sent {
                endpoint: endpoint.id,
                bytes: data.len(),
            })
        }
        Err(TransportError::ChannelNotRegistered { channel }) => {
            let outgoing = transport.is_registered(&channel, Direction::Outgoing);
            let incoming = transport.is_registered(&channel, Direction::Incoming);
            let logical = transport.is_registered(ctx.logical_channel, Direction::Outgoing);
            tracing::warn!(
                message_type = ctx.message_type,
                channel = %channel,
                logical_channel = ctx.logical_channel,
                outgoing,
                incoming,
                logical,
                "channel not registered, message dropped; register an outgoing \
                 and incoming handler for it before sending"
            );
            Ok(SendOutcome::Dropped(DropReason::ChannelNotRegistered { channel }))
        }
        Err(TransportError::PayloadTooLarge { size, max }) => {
            tracing::warn!(
                message_type = ctx.message_type,
                size,
                max,
                "transport refused oversized message, dropped"
            );
            Ok(SendOutcome::Dropped(DropReason::TransportOversized { size, max }))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                message_type = ctx.message_type,
                channel = ctx.logical_channel,
                transport_channel,
                %endpoint,
                fields = %display_fields(ctx.fields),
                "unexpected transport failure"
            );
            Err(e.into())
        }
    }
}

/// Joins field values in their debug form: `[1, "world", 3L]`.
pub(crate) fn display_fields(fields: &[Value]) -> String {
    let parts: Vec<String> = fields.iter().map(Value::to_string).collect();
    format!("[{}]", parts.join(", "))
}
