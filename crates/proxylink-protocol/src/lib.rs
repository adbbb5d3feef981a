//! Wire protocol for proxylink.
//!
//! This crate defines the byte format game servers and the proxy use to
//! exchange typed messages over a single plugin channel:
//!
//! - **Kinds** ([`Kind`], [`Value`]): the closed set of field types.
//! - **Codec** ([`Writer`], [`Reader`]): how one field becomes bytes.
//! - **Schemas** ([`ProxyMessage`], [`BungeeMessageType`]): which
//!   fields, in which order, each message type carries.
//! - **Envelopes** ([`Envelope`], [`IncomingMessage`]): header plus
//!   fields, the unit the transport carries.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer only knows bytes. It has no idea which endpoint a
//! message rides on or how large the transport allows it to be; those
//! rules live in the `proxylink` crate.
//!
//! ```text
//! Messenger (validate, guard, relay) → Protocol (bytes) → Transport
//! ```

mod codec;
pub mod compress;
mod envelope;
mod error;
mod kind;
mod rich_text;
mod schema;

pub use codec::{MAX_TEXT_LEN, Reader, Writer};
pub use compress::{COLOR_CHAR, compress, decompress};
pub use envelope::{Envelope, EnvelopeHeader, IncomingMessage};
pub use error::ProtocolError;
pub use kind::{Kind, NamedEnum, StructuredMap, Value};
pub use rich_text::{ClickAction, ClickEvent, RichText};
pub use schema::{BungeeMessageType, MessageSchema, ProxyMessage, validate_fields};
