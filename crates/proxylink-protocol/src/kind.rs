//! Payload kinds and the values that carry them.
//!
//! [`Kind`] is the closed set of field types the protocol can encode.
//! [`Value`] is a runtime field: one variant per kind, so checking a
//! field against a schema is a single comparison instead of a chain of
//! type tests.

use std::fmt;

use uuid::Uuid;

use crate::{ProtocolError, RichText};

/// An order-preserving, string-keyed map sent as one JSON text.
pub type StructuredMap = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// The category of one payload field.
///
/// Adding a payload type means adding a variant here and a branch in the
/// codec; there is no extension point by design of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// 4-byte big-endian signed integer.
    Int32,
    /// 8-byte big-endian IEEE 754 double.
    Float64,
    /// 8-byte big-endian signed integer.
    Int64,
    /// 1 byte, `0` or `1`.
    Bool,
    /// UTF-8 string behind a 16-bit length prefix.
    Text,
    /// Text that is escaped, deflated and Base64-armored first.
    CompressedText,
    /// 128-bit UUID, sent in canonical hyphenated form.
    Identifier,
    /// Declared name of an enumeration constant.
    EnumName,
    /// A [`StructuredMap`] serialized as JSON text.
    StructuredMap,
    /// A [`RichText`] component serialized as JSON text.
    RichText,
    /// Unprefixed trailing bytes. Only valid as the last field.
    RawBytes,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 11] = [
        Kind::Int32,
        Kind::Float64,
        Kind::Int64,
        Kind::Bool,
        Kind::Text,
        Kind::CompressedText,
        Kind::Identifier,
        Kind::EnumName,
        Kind::StructuredMap,
        Kind::RichText,
        Kind::RawBytes,
    ];

    /// Returns `true` for the kinds the legacy bare-primitive format
    /// understands.
    pub fn is_legacy_primitive(self) -> bool {
        matches!(self, Kind::Int32 | Kind::Float64 | Kind::Bool | Kind::Text)
    }

    /// The kind's display name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int32 => "Int32",
            Kind::Float64 => "Float64",
            Kind::Int64 => "Int64",
            Kind::Bool => "Bool",
            Kind::Text => "Text",
            Kind::CompressedText => "CompressedText",
            Kind::Identifier => "Identifier",
            Kind::EnumName => "EnumName",
            Kind::StructuredMap => "StructuredMap",
            Kind::RichText => "RichText",
            Kind::RawBytes => "RawBytes",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// NamedEnum
// ---------------------------------------------------------------------------

/// A closed enumeration whose constants travel by declared name.
///
/// Encoding writes [`name`](Self::name); decoding calls
/// [`from_name`](Self::from_name), which must be an exact match. There
/// is no case folding and no legacy-alias search.
pub trait NamedEnum: Sized + Copy + 'static {
    /// Name of the enumeration itself, for diagnostics.
    const ENUMERATION: &'static str;

    /// The constant's declared name.
    fn name(&self) -> &'static str;

    /// Resolves a constant by exact declared name.
    fn from_name(name: &str) -> Option<Self>;
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// One runtime payload field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int32(i32),
    Float64(f64),
    Int64(i64),
    Bool(bool),
    Text(String),
    CompressedText(String),
    Identifier(Uuid),
    EnumName(String),
    StructuredMap(StructuredMap),
    RichText(RichText),
    RawBytes(Vec<u8>),
}

impl Value {
    /// The kind this value encodes as.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int32(_) => Kind::Int32,
            Value::Float64(_) => Kind::Float64,
            Value::Int64(_) => Kind::Int64,
            Value::Bool(_) => Kind::Bool,
            Value::Text(_) => Kind::Text,
            Value::CompressedText(_) => Kind::CompressedText,
            Value::Identifier(_) => Kind::Identifier,
            Value::EnumName(_) => Kind::EnumName,
            Value::StructuredMap(_) => Kind::StructuredMap,
            Value::RichText(_) => Kind::RichText,
            Value::RawBytes(_) => Kind::RawBytes,
        }
    }

    /// Wraps an enumeration constant as an enum-name field.
    pub fn enum_name<E: NamedEnum>(constant: &E) -> Self {
        Value::EnumName(constant.name().to_string())
    }

    /// Wraps a string as a compressed-text field.
    pub fn compressed(text: impl Into<String>) -> Self {
        Value::CompressedText(text.into())
    }

    /// Resolves an enum-name field against `E` by exact name.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownEnumName`] if the name matches no
    /// constant of `E`, or if this value isn't an enum-name field at all.
    pub fn as_enum<E: NamedEnum>(&self) -> Result<E, ProtocolError> {
        match self {
            Value::EnumName(name) => {
                E::from_name(name).ok_or_else(|| ProtocolError::UnknownEnumName {
                    name: name.clone(),
                    enumeration: E::ENUMERATION,
                })
            }
            other => Err(ProtocolError::UnknownEnumName {
                name: format!("<{}>", other.kind()),
                enumeration: E::ENUMERATION,
            }),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrows the string of a text or compressed-text field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::CompressedText(s) | Value::EnumName(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Identifier(id) => Some(*id),
            _ => None,
        }
    }
}

/// The debug form used in send logs. Long payloads are summarised so a
/// log line never carries tens of kilobytes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 64;
        match self {
            Value::Int32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}L"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(s) | Value::CompressedText(s) | Value::EnumName(s) => {
                if s.chars().count() > PREVIEW {
                    let head: String = s.chars().take(PREVIEW).collect();
                    write!(f, "{head:?}... ({} bytes)", s.len())
                } else {
                    write!(f, "{s:?}")
                }
            }
            Value::Identifier(id) => write!(f, "{id}"),
            Value::StructuredMap(map) => write!(f, "{{{} entries}}", map.len()),
            Value::RichText(text) => write!(f, "{:?}", text.to_plain()),
            Value::RawBytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Identifier(v)
    }
}

impl From<StructuredMap> for Value {
    fn from(v: StructuredMap) -> Self {
        Value::StructuredMap(v)
    }
}

impl From<RichText> for Value {
    fn from(v: RichText) -> Self {
        Value::RichText(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::RawBytes(v)
    }
}
