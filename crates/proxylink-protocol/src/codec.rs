//! The kind codec: binary cursors for writing and reading fields.
//!
//! Every field is written back to back with no framing of its own beyond
//! what its kind needs:
//!
//! | Kind             | Bytes                                            |
//! |------------------|--------------------------------------------------|
//! | `Int32`          | 4, big-endian                                    |
//! | `Int64`          | 8, big-endian                                    |
//! | `Float64`        | 8, big-endian IEEE 754                           |
//! | `Bool`           | 1 (`0` / `1`)                                    |
//! | `Text`           | `u16` big-endian byte length, then UTF-8         |
//! | `CompressedText` | `Text` of [`compress`](crate::compress)ed string |
//! | `Identifier`     | `Text` of the hyphenated UUID                    |
//! | `EnumName`       | `Text` of the constant's declared name           |
//! | `StructuredMap`  | `Text` of the JSON object                        |
//! | `RichText`       | `Text` of the JSON component                     |
//! | `RawBytes`       | verbatim, to the end of the buffer               |
//!
//! The codec trusts its caller: [`Writer::write_value`] encodes whatever
//! kind the value carries. Checking values against a schema happens
//! before the first write (see [`crate::validate_fields`]).

use uuid::Uuid;

use crate::{Kind, ProtocolError, RichText, StructuredMap, Value, compress};

/// Largest byte length a `Text` field's 16-bit prefix can address.
pub const MAX_TEXT_LEN: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// An append-only output cursor.
///
/// A `Writer` is just a growing `Vec<u8>` with one method per primitive.
/// The primitives (`write_i32`, `write_f64`, ...) can't fail. Anything
/// that goes through a `Text` prefix can, because a string longer than
/// [`MAX_TEXT_LEN`] bytes has no valid encoding; those methods return
/// `Result` and leave the buffer untouched on error.
///
/// Most code never calls the primitives directly. It builds a
/// [`Value`] and hands it to [`write_value`](Self::write_value), which
/// picks the encoding from the value's kind:
///
/// ```rust
/// use proxylink_protocol::{Reader, Value, Writer};
///
/// let mut w = Writer::new();
/// w.write_value(&Value::from("lobby")).unwrap();
/// w.write_value(&Value::Int32(3)).unwrap();
///
/// // 2-byte prefix + "lobby" + 4-byte int
/// assert_eq!(w.len(), 2 + 5 + 4);
///
/// let bytes = w.into_bytes();
/// let mut r = Reader::new(&bytes);
/// assert_eq!(r.read_text().unwrap(), "lobby");
/// assert_eq!(r.read_i32().unwrap(), 3);
/// ```
///
/// Each send owns a fresh writer, so the write position is never shared
/// between messages.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    /// Writes a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`ProtocolError::TextTooLong`] if the UTF-8 encoding is
    /// longer than [`MAX_TEXT_LEN`]. Nothing is written in that case.
    pub fn write_text(&mut self, s: &str) -> Result<(), ProtocolError> {
        let len = u16::try_from(s.len()).map_err(|_| ProtocolError::TextTooLong {
            len: s.len(),
            max: MAX_TEXT_LEN,
        })?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    /// Writes a UUID in canonical hyphenated text form.
    pub fn write_uuid(&mut self, id: Uuid) -> Result<(), ProtocolError> {
        self.write_text(&id.hyphenated().to_string())
    }

    /// Appends bytes verbatim, without a prefix.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Encodes one field according to its kind.
    ///
    /// # Errors
    /// Fails if a text form is too long for its prefix, or if JSON or
    /// compression fails.
    pub fn write_value(&mut self, value: &Value) -> Result<(), ProtocolError> {
        match value {
            Value::Int32(v) => self.write_i32(*v),
            Value::Float64(v) => self.write_f64(*v),
            Value::Int64(v) => self.write_i64(*v),
            Value::Bool(v) => self.write_bool(*v),
            Value::Text(s) | Value::EnumName(s) => self.write_text(s)?,
            Value::CompressedText(s) => self.write_text(&compress::compress(s)?)?,
            Value::Identifier(id) => self.write_uuid(*id)?,
            Value::StructuredMap(map) => self.write_text(&serde_json::to_string(map)?)?,
            Value::RichText(text) => self.write_text(&text.to_json()?)?,
            Value::RawBytes(bytes) => self.write_raw(bytes),
        }
        Ok(())
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// A forward-only input cursor over a received byte array.
///
/// The wire format carries no field tags, so a `Reader` can't discover
/// what comes next on its own. The caller supplies the kind, usually
/// from a schema's content, and [`read_value`](Self::read_value) reads
/// exactly that. Reading past the end is an
/// [`UnexpectedEof`](ProtocolError::UnexpectedEof) error that says how
/// many bytes were needed and how many were left, never a panic.
///
/// The reader borrows the input; decoded strings and byte arrays are
/// copied out, so the buffer can be dropped as soon as decoding is done.
#[derive(Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], ProtocolError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ProtocolError::UnexpectedEof { needed, remaining });
        }
        let slice = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, ProtocolError> {
        Ok(f64::from_be_bytes(self.take_array()?))
    }

    /// Any non-zero byte reads as `true`.
    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        let [b] = self.take_array::<1>()?;
        Ok(b != 0)
    }

    pub fn read_text(&mut self) -> Result<String, ProtocolError> {
        let len = u16::from_be_bytes(self.take_array()?) as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    pub fn read_uuid(&mut self) -> Result<Uuid, ProtocolError> {
        let text = self.read_text()?;
        Uuid::parse_str(&text).map_err(|_| ProtocolError::InvalidIdentifier(text))
    }

    /// Consumes everything left in the buffer.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    /// Decodes one field of the given kind.
    ///
    /// # Errors
    /// Fails on truncated input, invalid UTF-8, a malformed UUID, JSON
    /// that doesn't parse, or compressed text that doesn't inflate.
    pub fn read_value(&mut self, kind: Kind) -> Result<Value, ProtocolError> {
        let value = match kind {
            Kind::Int32 => Value::Int32(self.read_i32()?),
            Kind::Float64 => Value::Float64(self.read_f64()?),
            Kind::Int64 => Value::Int64(self.read_i64()?),
            Kind::Bool => Value::Bool(self.read_bool()?),
            Kind::Text => Value::Text(self.read_text()?),
            Kind::CompressedText => {
                Value::CompressedText(compress::decompress(&self.read_text()?)?)
            }
            Kind::Identifier => Value::Identifier(self.read_uuid()?),
            Kind::EnumName => Value::EnumName(self.read_text()?),
            Kind::StructuredMap => {
                let map: StructuredMap = serde_json::from_str(&self.read_text()?)?;
                Value::StructuredMap(map)
            }
            Kind::RichText => Value::RichText(RichText::from_json(&self.read_text()?)?),
            Kind::RawBytes => Value::RawBytes(self.read_rest().to_vec()),
        };
        Ok(value)
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

// =========================================================================
// Tests
// =========================================================================
