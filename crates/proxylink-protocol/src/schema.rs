//! Message schemas: the closed registries of message types.
//!
//! A message type is a named constant that owns an ordered list of
//! [`Kind`]s (its *content*). Two registries live side by side:
//!
//! - [`ProxyMessage`]: the current set, used on the proxylink channel.
//! - [`BungeeMessageType`]: the older set, kept for servers that still
//!   speak it.
//!
//! Both implement [`MessageSchema`], so the envelope builder doesn't care
//! which one a channel uses. Both are fixed at compile time; the only
//! runtime state is the name lookup table, built once on first use.

use std::fmt;

use crate::{Kind, NamedEnum, ProtocolError, Value};

/// A message type: a declared name plus the kinds of its fields.
///
/// The name (from [`NamedEnum`]) goes into the envelope header so the
/// receiver knows which schema to decode with. The content is the
/// contract for everything after the header: exactly that many fields,
/// each of exactly that kind, in that order.
///
/// ```rust
/// use proxylink_protocol::{Kind, MessageSchema, NamedEnum, ProxyMessage};
///
/// let teleport = ProxyMessage::PlayerTeleport;
/// assert_eq!(teleport.name(), "PLAYER_TELEPORT");
/// assert_eq!(
///     teleport.content(),
///     &[Kind::Identifier, Kind::Text, Kind::Int32, Kind::Int32, Kind::Int32]
/// );
/// ```
///
/// Registries are declared with the `message_types!` macro rather than
/// implemented by hand, so name, content and lookup table can't drift
/// apart. Implementing it manually works too; the envelope code only
/// ever sees the trait.
pub trait MessageSchema: NamedEnum + fmt::Debug + Send + Sync {
    /// The ordered kinds every envelope of this type must carry.
    fn content(&self) -> &'static [Kind];
}

/// Declares a registry enum together with its names and contents.
///
/// ```text
/// message_types! {
///     pub enum Example as "Example" {
///         Ping = "PING" => [Int64],
///     }
/// }
/// ```
macro_rules! message_types {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $enumeration:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $wire:literal => [$($kind:ident),* $(,)?]
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),*
        }

        impl $name {
            /// Every message type of this registry, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),* ];
        }

        impl $crate::NamedEnum for $name {
            const ENUMERATION: &'static str = $enumeration;

            fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),*
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                static BY_NAME: ::std::sync::LazyLock<
                    ::std::collections::HashMap<&'static str, $name>,
                > = ::std::sync::LazyLock::new(|| {
                    $name::ALL
                        .iter()
                        .map(|t| ($crate::NamedEnum::name(t), *t))
                        .collect()
                });
                BY_NAME.get(name).copied()
            }
        }

        impl $crate::MessageSchema for $name {
            fn content(&self) -> &'static [$crate::Kind] {
                match self {
                    $( $name::$variant => &[ $( $crate::Kind::$kind ),* ] ),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::NamedEnum::name(self))
            }
        }
    };
}

message_types! {
    /// Messages exchanged between game servers and the proxy.
    pub enum ProxyMessage as "ProxyMessage" {
        /// Broadcast a line of text to every player on the network.
        Broadcast = "BROADCAST" => [Text],
        /// Server filter (empty for all), then a long, compressed announcement.
        Announcement = "ANNOUNCEMENT" => [Text, CompressedText],
        /// Send a formatted message to one player, wherever they are.
        TellPlayer = "TELL_PLAYER" => [Identifier, RichText],
        /// Player, world, x, y, z.
        PlayerTeleport = "PLAYER_TELEPORT" => [Identifier, Text, Int32, Int32, Int32],
        /// Target server, command line.
        ForwardCommand = "FORWARD_COMMAND" => [Text, Text],
        /// Arbitrary per-player data synced across servers.
        PlayerData = "PLAYER_DATA" => [Identifier, StructuredMap],
        /// Player, game mode constant.
        GameMode = "GAME_MODE" => [Identifier, EnumName],
        /// TPS, uptime in ms, online players, whitelisted.
        ServerStatus = "SERVER_STATUS" => [Float64, Int64, Int32, Bool],
        /// Plugin tag, then an opaque trailing blob.
        PluginData = "PLUGIN_DATA" => [Text, RawBytes],
        /// Server name, human-friendly alias.
        ServerAlias = "SERVER_ALIAS" => [Text, Text],
    }
}

message_types! {
    /// The older message set, kept so that servers still on it interoperate.
    pub enum BungeeMessageType as "BungeeMessageType" {
        ChatRelay = "CHAT_RELAY" => [Identifier, Text],
        /// Player, from server, to server.
        PlayerSwitch = "PLAYER_SWITCH" => [Identifier, Text, Text],
        KickPlayer = "KICK_PLAYER" => [Identifier, Text],
        PlayerCount = "PLAYER_COUNT" => [Text, Int32],
    }
}

/// Checks `fields` against `schema` before anything is encoded.
///
/// The checks run in order: field count, raw-bytes placement in the
/// schema, then each field's kind against its position.
///
/// # Errors
/// - [`ProtocolError::ArityMismatch`] if the counts differ.
/// - [`ProtocolError::RawBytesNotLast`] if the schema itself is invalid.
/// - [`ProtocolError::KindMismatch`] at the first mismatched position.
pub fn validate_fields<S: MessageSchema>(
    schema: &S,
    fields: &[Value],
) -> Result<(), ProtocolError> {
    let content = schema.content();

    if fields.len() != content.len() {
        return Err(ProtocolError::ArityMismatch {
            message_type: schema.name(),
            expected: content.len(),
            actual: fields.len(),
        });
    }

    if let Some(position) = content
        .iter()
        .take(content.len().saturating_sub(1))
        .position(|k| *k == Kind::RawBytes)
    {
        return Err(ProtocolError::RawBytesNotLast {
            message_type: schema.name(),
            position,
        });
    }

    for (position, (expected, value)) in content.iter().zip(fields).enumerate() {
        let actual = value.kind();
        if actual != *expected {
            return Err(ProtocolError::KindMismatch {
                message_type: schema.name(),
                position,
                expected: *expected,
                actual,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    message_types! {
        enum Broken as "Broken" {
            BlobFirst = "BLOB_FIRST" => [RawBytes, Text],
            Empty = "EMPTY" => [],
        }
    }

    #[test]
    fn test_from_name_resolves_every_proxy_message() {
        for message in ProxyMessage::ALL {
            assert_eq!(ProxyMessage::from_name(message.name()), Some(*message));
        }
    }

    #[test]
    fn test_from_name_resolves_every_bungee_message() {
        for message in BungeeMessageType::ALL {
            assert_eq!(BungeeMessageType::from_name(message.name()), Some(*message));
        }
    }

    #[test]
    fn test_from_name_unknown_or_wrong_case_is_none() {
        assert_eq!(ProxyMessage::from_name("FLY_TO_MOON"), None);
        assert_eq!(ProxyMessage::from_name("broadcast"), None);
    }

    #[test]
    fn test_names_are_unique_within_each_registry() {
        let names: std::collections::HashSet<_> =
            ProxyMessage::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), ProxyMessage::ALL.len());
    }

    #[test]
    fn test_raw_bytes_only_ever_last_in_registries() {
        let schemas = ProxyMessage::ALL
            .iter()
            .map(|m| m.content())
            .chain(BungeeMessageType::ALL.iter().map(|m| m.content()));
        for content in schemas {
            if let Some(pos) = content.iter().position(|k| *k == Kind::RawBytes) {
                assert_eq!(pos, content.len() - 1);
            }
        }
    }

    #[test]
    fn test_content_player_teleport() {
        assert_eq!(
            ProxyMessage::PlayerTeleport.content(),
            &[Kind::Identifier, Kind::Text, Kind::Int32, Kind::Int32, Kind::Int32]
        );
        assert_eq!(ProxyMessage::Broadcast.content(), &[Kind::Text]);
    }

    #[test]
    fn test_validate_matching_fields_ok() {
        let fields = [
            Value::Identifier(Uuid::new_v4()),
            Value::Text("world".into()),
            Value::Int32(1),
            Value::Int32(2),
            Value::Int32(3),
        ];
        assert!(validate_fields(&ProxyMessage::PlayerTeleport, &fields).is_ok());
    }

    #[test]
    fn test_validate_too_few_and_too_many_fields_fail() {
        let content_len = ProxyMessage::ForwardCommand.content().len();
        for count in [0, 1, 3, 4] {
            let fields = vec![Value::Text("x".into()); count];
            match validate_fields(&ProxyMessage::ForwardCommand, &fields) {
                Err(ProtocolError::ArityMismatch { expected, actual, .. }) => {
                    assert_eq!(expected, content_len);
                    assert_eq!(actual, count);
                }
                other => panic!("expected ArityMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_arity_message_names_both_counts_and_type() {
        let fields = vec![Value::Text("x".into()); 3];
        let err = validate_fields(&ProxyMessage::ServerAlias, &fields).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
        assert!(msg.contains("SERVER_ALIAS"));
    }

    #[test]
    fn test_validate_wrong_kind_reports_position() {
        let fields = [
            Value::Identifier(Uuid::new_v4()),
            Value::Text("world".into()),
            Value::Int32(1),
            Value::Int64(2),
            Value::Int32(3),
        ];
        match validate_fields(&ProxyMessage::PlayerTeleport, &fields) {
            Err(ProtocolError::KindMismatch {
                message_type,
                position,
                expected,
                actual,
            }) => {
                assert_eq!(message_type, "PLAYER_TELEPORT");
                assert_eq!(position, 3);
                assert_eq!(expected, Kind::Int32);
                assert_eq!(actual, Kind::Int64);
            }
            other => panic!("expected KindMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_text_is_not_compressed_text() {
        let fields = [Value::Text("".into()), Value::Text("long".into())];
        assert!(matches!(
            validate_fields(&ProxyMessage::Announcement, &fields),
            Err(ProtocolError::KindMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn test_validate_schema_with_leading_raw_bytes_fails() {
        let fields = [Value::RawBytes(vec![1]), Value::Text("x".into())];
        assert!(matches!(
            validate_fields(&Broken::BlobFirst, &fields),
            Err(ProtocolError::RawBytesNotLast { position: 0, .. })
        ));
    }

    #[test]
    fn test_validate_empty_schema_accepts_no_fields() {
        assert!(validate_fields(&Broken::Empty, &[]).is_ok());
        assert_eq!(Broken::from_name("EMPTY"), Some(Broken::Empty));
    }
}
