//! End-to-end encode/decode tests for the envelope format.
//!
//! These go through the public API only, the same way a game server and
//! the proxy would: encode an [`Envelope`], hand the bytes over, split
//! them with [`IncomingMessage::decode`], decode the body per schema.

use proxylink_protocol::{
    BungeeMessageType, Envelope, IncomingMessage, Kind, MessageSchema, NamedEnum,
    ProtocolError, ProxyMessage, Reader, RichText, StructuredMap, Value, Writer,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
enum GameMode {
    Survival,
    Adventure,
}

impl NamedEnum for GameMode {
    const ENUMERATION: &'static str = "GameMode";

    fn name(&self) -> &'static str {
        match self {
            GameMode::Survival => "SURVIVAL",
            GameMode::Adventure => "ADVENTURE",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "SURVIVAL" => Some(GameMode::Survival),
            "ADVENTURE" => Some(GameMode::Adventure),
            _ => None,
        }
    }
}

/// A representative value for each kind.
fn sample(kind: Kind) -> Value {
    match kind {
        Kind::Int32 => Value::Int32(-42),
        Kind::Float64 => Value::Float64(19.98),
        Kind::Int64 => Value::Int64(86_400_000),
        Kind::Bool => Value::Bool(true),
        Kind::Text => Value::Text("hub-§a01".into()),
        Kind::CompressedText => Value::compressed("§c§lRestart §rin 5 minutes. ".repeat(40)),
        Kind::Identifier => Value::Identifier(Uuid::new_v4()),
        Kind::EnumName => Value::enum_name(&GameMode::Adventure),
        Kind::StructuredMap => {
            let mut map = StructuredMap::new();
            map.insert("coins".into(), 250.into());
            map.insert("balance".into(), serde_json::json!(907.3038322028689));
            map.insert("nick".into(), "Notch".into());
            map.insert("flags".into(), serde_json::json!(["vip", "muted"]));
            Value::StructuredMap(map)
        }
        Kind::RichText => Value::RichText(
            RichText::plain("Hello ").color("gold").append(RichText::plain("world").bold()),
        ),
        Kind::RawBytes => Value::RawBytes(vec![0, 1, 2, 254, 255]),
    }
}

fn round_trip<S: MessageSchema>(message_type: S, fields: &[Value]) -> (S, Vec<Value>) {
    let bytes = Envelope {
        channel: "proxylink:main",
        sender: Uuid::new_v4(),
        origin: "survival-2",
        message_type,
        fields,
    }
    .encode()
    .expect("encode should succeed");

    IncomingMessage::decode(&bytes)
        .expect("header should decode")
        .decode_fields::<S>()
        .expect("fields should decode")
}

#[test]
fn test_every_proxy_message_round_trips() {
    for message_type in ProxyMessage::ALL {
        let fields: Vec<Value> = message_type.content().iter().map(|k| sample(*k)).collect();
        let (decoded_type, decoded) = round_trip(*message_type, &fields);
        assert_eq!(decoded_type, *message_type);
        assert_eq!(decoded, fields, "{message_type} did not round-trip");
    }
}

#[test]
fn test_every_bungee_message_round_trips() {
    for message_type in BungeeMessageType::ALL {
        let fields: Vec<Value> = message_type.content().iter().map(|k| sample(*k)).collect();
        let (_, decoded) = round_trip(*message_type, &fields);
        assert_eq!(decoded, fields);
    }
}

#[test]
fn test_player_teleport_header_and_fields() {
    let player = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let fields = [
        Value::Identifier(player),
        Value::Text("world_nether".into()),
        Value::Int32(100),
        Value::Int32(64),
        Value::Int32(-200),
    ];

    let bytes = Envelope {
        channel: "proxylink:main",
        sender,
        origin: "survival-2",
        message_type: ProxyMessage::PlayerTeleport,
        fields: &fields,
    }
    .encode()
    .unwrap();

    let incoming = IncomingMessage::decode(&bytes).unwrap();
    assert_eq!(incoming.header.channel, "proxylink:main");
    assert_eq!(incoming.header.sender, sender);
    assert_eq!(incoming.header.origin, "survival-2");
    assert_eq!(incoming.header.message_type, "PLAYER_TELEPORT");

    let (_, decoded) = incoming.decode_fields::<ProxyMessage>().unwrap();
    assert_eq!(decoded, fields);
}

#[test]
fn test_enum_name_field_resolves_on_receiving_side() {
    let fields = [Value::Identifier(Uuid::nil()), Value::enum_name(&GameMode::Survival)];
    let (_, decoded) = round_trip(ProxyMessage::GameMode, &fields);
    assert_eq!(decoded[1].as_enum::<GameMode>().unwrap(), GameMode::Survival);
}

#[test]
fn test_compressed_text_is_smaller_on_the_wire() {
    let text = "§eVote for us at example.org! ".repeat(300);
    let compressed = Envelope {
        channel: "c",
        sender: Uuid::nil(),
        origin: "o",
        message_type: ProxyMessage::Announcement,
        fields: &[Value::Text(String::new()), Value::compressed(text.clone())],
    }
    .encode()
    .unwrap();

    assert!(compressed.len() < text.len() / 4);
}

#[test]
fn test_text_over_prefix_range_fails_to_encode() {
    let result = Envelope {
        channel: "c",
        sender: Uuid::nil(),
        origin: "o",
        message_type: ProxyMessage::Broadcast,
        fields: &[Value::Text("x".repeat(70_000))],
    }
    .encode();
    assert!(matches!(result, Err(ProtocolError::TextTooLong { len: 70_000, .. })));
}

#[test]
fn test_structured_map_accepted_where_schema_declares_it() {
    let fields = [Value::Identifier(Uuid::new_v4()), sample(Kind::StructuredMap)];
    let (_, decoded) = round_trip(ProxyMessage::PlayerData, &fields);
    assert_eq!(decoded, fields);
}

#[test]
fn test_structured_map_floats_decode_bit_exact() {
    // Spread values over [0, 1000) with awkward low-order digits.
    let mut floats: Vec<f64> = (1..=20_000)
        .map(|i| (i as f64 * 0.618_033_988_749_894_9).fract() * 1000.0)
        .collect();
    floats.extend([907.3038322028689, 0.1 + 0.2, 1e-300, 5e-324, f64::MAX]);

    for f in floats {
        let mut map = StructuredMap::new();
        map.insert("balance".into(), serde_json::json!(f));
        let value = Value::StructuredMap(map);

        let mut w = Writer::new();
        w.write_value(&value).unwrap();
        let bytes = w.into_bytes();
        let decoded = Reader::new(&bytes).read_value(Kind::StructuredMap).unwrap();

        let back = match &decoded {
            Value::StructuredMap(map) => map["balance"].as_f64().unwrap(),
            other => panic!("expected a map, got {other:?}"),
        };
        assert_eq!(back.to_bits(), f.to_bits(), "{f} came back as {back}");
    }
}
