//! Envelope framing for serialized models.
//!
//! Wire format: [1 byte: format][1 byte: version][N bytes: payload]
//! The only known format is protobuf (2). The version byte is always written
//! as 0 and ignored on read; it keeps the header at the length older readers
//! expect.

use crate::error::FormatError;
use crate::versioner::{ProtoVersioner, Version, V0};

/// Header length; the payload starts at this offset.
pub const ENVELOPE_OFFSET: usize = 2;

/// Payload encoding named by the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Format {
    Proto = 2,
}

impl Format {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            2 => Some(Format::Proto),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A parsed envelope borrowing its payload from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub format: Format,
    pub version: Version,
    pub payload: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split the header from the payload.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, FormatError> {
        if bytes.len() < ENVELOPE_OFFSET {
            return Err(FormatError::FormatIncompatible(format!(
                "envelope is {} bytes, shorter than its {}-byte header",
                bytes.len(),
                ENVELOPE_OFFSET
            )));
        }
        let format = Format::from_byte(bytes[0]).ok_or_else(|| {
            FormatError::FormatIncompatible(format!("unknown envelope format {}", bytes[0]))
        })?;
        Ok(Self {
            format,
            version: Version(bytes[1]),
            payload: &bytes[ENVELOPE_OFFSET..],
        })
    }
}

/// Serialize a model and prefix it with the envelope header.
pub fn marshal_envelope<M: ProtoVersioner>(model: &M) -> Vec<u8> {
    let payload = model.encode_to_vec();
    let mut bytes = Vec::with_capacity(ENVELOPE_OFFSET + payload.len());
    bytes.push(Format::Proto.as_byte());
    bytes.push(V0.0);
    bytes.extend_from_slice(&payload);
    bytes
}

/// Decode an envelope into `model`.
///
/// `model` is replaced only when the whole payload decodes.
pub fn unmarshal_envelope<M: ProtoVersioner>(
    bytes: &[u8],
    model: &mut M,
) -> Result<(), FormatError> {
    *model = decode_envelope(bytes)?;
    Ok(())
}

/// Decode an envelope into a fresh model.
pub fn decode_envelope<M: ProtoVersioner>(bytes: &[u8]) -> Result<M, FormatError> {
    let envelope = Envelope::parse(bytes)?;
    match envelope.format {
        Format::Proto => Ok(M::decode(envelope.payload)?),
    }
}
