//! Messenger configuration.

use proxylink_transport::{DEFAULT_CHANNEL, MAX_PAYLOAD_SIZE};
use serde::{Deserialize, Serialize};

use crate::guard::SOFT_LIMIT;

/// Configuration for a [`Messenger`](crate::Messenger).
///
/// Hosts usually load this from their own config file, so it derives
/// serde and every field has a default:
///
/// ```rust
/// use proxylink::MessengerConfig;
///
/// let config: MessengerConfig =
///     serde_json::from_str(r#"{ "origin_name": "lobby-1", "debug": true }"#).unwrap();
///
/// assert_eq!(config.origin_name, "lobby-1");
/// assert_eq!(config.size_limit, 30_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    /// Name of this server process, written into every envelope header.
    pub origin_name: String,

    /// The platform channel envelopes ride on.
    ///
    /// Default: `"BungeeCord"`. The logical channel travels inside the
    /// header, so every logical channel shares this one.
    pub transport_channel: String,

    /// Encoded envelopes at or above this many bytes are dropped.
    ///
    /// Default: 30,000. Never exceeds the transport's hard cap; the
    /// builder clamps it.
    pub size_limit: usize,

    /// Log every send with its field values at debug level.
    pub debug: bool,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            origin_name: "server".to_string(),
            transport_channel: DEFAULT_CHANNEL.to_string(),
            size_limit: SOFT_LIMIT,
            debug: false,
        }
    }
}

impl MessengerConfig {
    /// The size limit actually enforced against a transport whose hard
    /// cap is `hard_cap`.
    pub fn effective_size_limit(&self, hard_cap: usize) -> usize {
        self.size_limit.min(hard_cap).min(MAX_PAYLOAD_SIZE)
    }
}
