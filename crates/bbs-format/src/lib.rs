//! Record format: envelope framing, encrypted storage encoding, re-encryption.

pub mod encoder;
pub mod envelope;
pub mod error;
pub mod reencrypt;
pub mod serializer;
pub mod versioner;

pub use encoder::{frame, parse_frame, peek_key_label, Encoder};
pub use envelope::{
    decode_envelope, marshal_envelope, unmarshal_envelope, Envelope, Format, ENVELOPE_OFFSET,
};
pub use error::{ErrorKind, FormatError};
pub use reencrypt::ReencryptionReport;
pub use serializer::Serializer;
pub use versioner::{FieldError, ModelError, ProtoVersioner, Validation, Version, Versioner, V0};
