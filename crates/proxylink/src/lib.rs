//! # proxylink
//!
//! Typed messaging between game servers and the proxy in front of them.
//!
//! The hosting platform gives a server one thing: a plugin channel that
//! carries opaque byte arrays through a connected player's session, up
//! to 32,766 bytes each. proxylink builds a small protocol on top:
//!
//! - a header naming the logical channel, the relaying endpoint, the
//!   origin server and the message type;
//! - schema-checked fields, encoded per their [`Kind`](proxylink_protocol::Kind);
//! - a size guard that drops oversized messages instead of letting the
//!   platform reject them;
//! - a relay that turns expected transport failures into warnings.
//!
//! ## Quick Start
//!
//! ```rust
//! use proxylink::prelude::*;
//!
//! let (transport, _deliveries) = LoopbackTransport::new();
//! transport.register_both(DEFAULT_CHANNEL);
//! let steve = transport.connect("Steve");
//!
//! let messenger = Messenger::builder()
//!     .origin_name("lobby-1")
//!     .build(transport.clone(), transport);
//!
//! let outcome = messenger
//!     .send(None, "proxylink:main", ProxyMessage::Broadcast, &[Value::from("Hello!")])
//!     .unwrap();
//! assert!(matches!(outcome, SendOutcome::Sent { endpoint, .. } if endpoint == steve.id));
//! ```
//!
//! The protocol is fire-and-forget: once bytes are handed off there is no
//! acknowledgement, retry, or encryption.

mod config;
mod dispatch;
mod error;
mod guard;
pub mod legacy;
mod messenger;
mod outcome;
mod relay;

pub use config::MessengerConfig;
pub use dispatch::{ChannelListener, Dispatcher};
pub use error::ProxyLinkError;
pub use guard::{SOFT_LIMIT, SizeGuard};
pub use messenger::{Messenger, MessengerBuilder};
pub use outcome::{DropReason, SendOutcome};

/// Everything needed to send and receive, in one import.
pub mod prelude {
    pub use crate::{
        ChannelListener, Dispatcher, DropReason, Messenger, MessengerConfig, ProxyLinkError,
        SendOutcome,
    };
    pub use proxylink_protocol::{
        BungeeMessageType, IncomingMessage, Kind, MessageSchema, NamedEnum, ProxyMessage,
        RichText, StructuredMap, Value,
    };
    pub use proxylink_transport::{
        DEFAULT_CHANNEL, Endpoint, EndpointId, LoopbackTransport, MAX_PAYLOAD_SIZE,
    };
}
