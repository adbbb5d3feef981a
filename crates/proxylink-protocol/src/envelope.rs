//! Envelope wire format: header, then schema-ordered fields.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Text  channel                        │
//! │ Text  sender identity (UUID string)  │
//! │ Text  origin server name             │
//! │ Text  message type name              │
//! ├──────────────────────────────────────┤
//! │ content[0] per the kind codec        │
//! │ content[1]                           │
//! │ ...                                  │
//! └──────────────────────────────────────┘
//! ```
//!
//! There is no overall length prefix: the transport already delivers
//! each byte array whole.

use uuid::Uuid;

use crate::{
    MessageSchema, NamedEnum, ProtocolError, Reader, Value, Writer, validate_fields,
};

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// The four text fields every schema-validated envelope starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeader {
    /// Logical channel the message belongs to.
    pub channel: String,
    /// Identity of the endpoint the message was relayed through.
    pub sender: Uuid,
    /// Name of the server process that produced the message.
    pub origin: String,
    /// Declared name of the message type.
    pub message_type: String,
}

impl EnvelopeHeader {
    /// Writes the header in wire order.
    ///
    /// # Errors
    /// Returns [`ProtocolError::TextTooLong`] if any header string is too
    /// long for its prefix.
    pub fn write(&self, w: &mut Writer) -> Result<(), ProtocolError> {
        w.write_text(&self.channel)?;
        w.write_uuid(self.sender)?;
        w.write_text(&self.origin)?;
        w.write_text(&self.message_type)
    }

    /// Reads a header, leaving the cursor at the first field.
    ///
    /// # Errors
    /// Fails on truncated input, invalid UTF-8, or a malformed sender UUID.
    pub fn read(r: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        let channel = r.read_text()?;
        let sender = r.read_uuid()?;
        let origin = r.read_text()?;
        let message_type = r.read_text()?;
        Ok(Self {
            channel,
            sender,
            origin,
            message_type,
        })
    }
}

// ---------------------------------------------------------------------------
// Outbound envelope
// ---------------------------------------------------------------------------

/// One outbound message, borrowed for the duration of a single encode.
#[derive(Debug)]
pub struct Envelope<'a, S: MessageSchema> {
    pub channel: &'a str,
    pub sender: Uuid,
    pub origin: &'a str,
    pub message_type: S,
    pub fields: &'a [Value],
}

impl<S: MessageSchema> Envelope<'_, S> {
    /// Validates the fields against the schema, then encodes the whole
    /// envelope into a fresh buffer.
    ///
    /// Validation finishes before the first byte is written, so a
    /// schema violation never produces a partial buffer.
    ///
    /// # Errors
    /// - Any error from [`validate_fields`].
    /// - [`ProtocolError::TextTooLong`] and friends from the kind codec.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        validate_fields(&self.message_type, self.fields)?;

        let mut w = Writer::with_capacity(256);
        EnvelopeHeader {
            channel: self.channel.to_string(),
            sender: self.sender,
            origin: self.origin.to_string(),
            message_type: self.message_type.name().to_string(),
        }
        .write(&mut w)?;

        for field in self.fields {
            w.write_value(field)?;
        }

        Ok(w.into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Inbound message
// ---------------------------------------------------------------------------

/// A received byte array split into its header and undecoded body.
///
/// This is what a receiving dispatcher hands to listeners: the header
/// is always readable, the body needs the right registry to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub header: EnvelopeHeader,
    pub body: Vec<u8>,
}

impl IncomingMessage {
    /// Splits a raw byte array into header and body.
    ///
    /// # Errors
    /// Fails if the header can't be read.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = Reader::new(data);
        let header = EnvelopeHeader::read(&mut r)?;
        Ok(Self {
            header,
            body: r.read_rest().to_vec(),
        })
    }

    /// Resolves the header's message type name against registry `S`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownMessageType`] on no exact match.
    pub fn message_type<S: MessageSchema>(&self) -> Result<S, ProtocolError> {
        S::from_name(&self.header.message_type)
            .ok_or_else(|| ProtocolError::UnknownMessageType(self.header.message_type.clone()))
    }

    /// Resolves the message type and decodes the body per its schema.
    ///
    /// # Errors
    /// - [`ProtocolError::UnknownMessageType`] if the name isn't in `S`.
    /// - Any kind codec read error.
    /// - [`ProtocolError::TrailingBytes`] if bytes remain after the last
    ///   field.
    pub fn decode_fields<S: MessageSchema>(&self) -> Result<(S, Vec<Value>), ProtocolError> {
        let message_type = self.message_type::<S>()?;
        let mut r = Reader::new(&self.body);

        let fields = message_type
            .content()
            .iter()
            .map(|kind| r.read_value(*kind))
            .collect::<Result<Vec<_>, _>>()?;

        if !r.is_empty() {
            return Err(ProtocolError::TrailingBytes {
                message_type: message_type.name(),
                count: r.remaining(),
            });
        }

        Ok((message_type, fields))
    }
}
