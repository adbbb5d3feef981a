//! The legacy bare-primitive format.
//!
//! Some third-party receivers on the `BungeeCord` channel only read a
//! plain sequence of primitives: no header, no message type, no schema.
//! This module writes and reads that format. It only knows `Int32`,
//! `Float64`, `Bool` and `Text`; anything else is rejected before a
//! byte is written.

use proxylink_protocol::{Kind, Reader, Value, Writer};

use crate::ProxyLinkError;

/// Checks that `fields` is non-empty and all primitive.
///
/// # Errors
/// - [`ProxyLinkError::EmptyLegacyPayload`] for no fields.
/// - [`ProxyLinkError::UnsupportedLegacyKind`] at the first
///   non-primitive field.
pub fn validate(fields: &[Value]) -> Result<(), ProxyLinkError> {
    if fields.is_empty() {
        return Err(ProxyLinkError::EmptyLegacyPayload);
    }
    match fields.iter().position(|f| !f.kind().is_legacy_primitive()) {
        Some(position) => Err(ProxyLinkError::UnsupportedLegacyKind {
            position,
            kind: fields[position].kind(),
        }),
        None => Ok(()),
    }
}

/// Encodes `fields` back to back in caller order.
///
/// # Errors
/// Any [`validate`] error, or [`ProtocolError::TextTooLong`](proxylink_protocol::ProtocolError::TextTooLong).
pub fn encode(fields: &[Value]) -> Result<Vec<u8>, ProxyLinkError> {
    validate(fields)?;
    let mut w = Writer::new();
    for field in fields {
        w.write_value(field)?;
    }
    Ok(w.into_bytes())
}

/// Reads a legacy payload, given the kinds the receiver expects.
///
/// # Errors
/// [`ProxyLinkError::UnsupportedLegacyKind`] for a non-primitive kind,
/// or a protocol error on truncated or malformed input.
pub fn decode(data: &[u8], kinds: &[Kind]) -> Result<Vec<Value>, ProxyLinkError> {
    let mut r = Reader::new(data);
    kinds
        .iter()
        .enumerate()
        .map(|(position, kind)| {
            if !kind.is_legacy_primitive() {
                return Err(ProxyLinkError::UnsupportedLegacyKind {
                    position,
                    kind: *kind,
                });
            }
            Ok(r.read_value(*kind)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxylink_protocol::StructuredMap;

    #[test]
    fn test_encode_has_no_header() {
        let bytes = encode(&[Value::Text("Connect".into()), Value::Text("lobby".into())]).unwrap();
        assert_eq!(bytes, b"\x00\x07Connect\x00\x05lobby");
    }

    #[test]
    fn test_encode_then_decode_primitives() {
        let fields = vec![
            Value::Text("PlayerCount".into()),
            Value::Int32(12),
            Value::Float64(0.25),
            Value::Bool(false),
        ];
        let bytes = encode(&fields).unwrap();
        let kinds: Vec<Kind> = fields.iter().map(Value::kind).collect();
        assert_eq!(decode(&bytes, &kinds).unwrap(), fields);
    }

    #[test]
    fn test_encode_empty_is_rejected() {
        assert!(matches!(encode(&[]), Err(ProxyLinkError::EmptyLegacyPayload)));
    }

    #[test]
    fn test_encode_structured_map_is_unknown_type_of_data() {
        let fields = [Value::Text("x".into()), Value::StructuredMap(StructuredMap::new())];
        let err = encode(&fields).unwrap_err();
        assert!(matches!(
            err,
            ProxyLinkError::UnsupportedLegacyKind { position: 1, kind: Kind::StructuredMap }
        ));
        assert!(err.to_string().contains("unknown type of data"));
    }

    #[test]
    fn test_encode_rejects_every_non_primitive_kind() {
        let rejected = [
            Value::Int64(1),
            Value::compressed("x"),
            Value::Identifier(uuid::Uuid::nil()),
            Value::EnumName("X".into()),
            Value::RawBytes(vec![]),
        ];
        for value in rejected {
            assert!(encode(&[value]).is_err());
        }
    }

    #[test]
    fn test_decode_non_primitive_kind_is_rejected() {
        assert!(matches!(
            decode(&[], &[Kind::Identifier]),
            Err(ProxyLinkError::UnsupportedLegacyKind { position: 0, .. })
        ));
    }

    #[test]
    fn test_decode_truncated_is_protocol_error() {
        assert!(matches!(
            decode(&[0, 0], &[Kind::Int32]),
            Err(ProxyLinkError::Protocol(_))
        ));
    }
}
