//! Model <-> stored value pipeline used by the storage layer.
//!
//! Write: model → protobuf → envelope header → encrypt → frame → base64
//! Read:  base64 → frame → decrypt → envelope header → protobuf → model

use bbs_crypto::Cryptor;

use crate::encoder::{peek_key_label, Encoder};
use crate::envelope::{marshal_envelope, unmarshal_envelope, Envelope};
use crate::error::FormatError;
use crate::versioner::ProtoVersioner;

#[derive(Debug, Clone)]
pub struct Serializer {
    encoder: Encoder,
}

impl Serializer {
    pub fn new(cryptor: Cryptor) -> Self {
        Self {
            encoder: Encoder::new(cryptor),
        }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn cryptor(&self) -> &Cryptor {
        self.encoder.cryptor()
    }

    pub fn marshal<M: ProtoVersioner>(&self, model: &M) -> Result<Vec<u8>, FormatError> {
        self.encoder.encode(&marshal_envelope(model))
    }

    /// Decode a stored value into `model`, which is left as it was on failure.
    pub fn unmarshal<M: ProtoVersioner>(
        &self,
        stored: &[u8],
        model: &mut M,
    ) -> Result<(), FormatError> {
        self.encoder
            .decode(stored)
            .and_then(|payload| unmarshal_envelope(&payload, model))
            .map_err(|e| read_failure(stored, e))
    }

    /// Decode a stored value, then run the model's migration and validation
    /// hooks. The value is returned only if both succeed.
    pub fn unmarshal_validated<M: ProtoVersioner>(&self, stored: &[u8]) -> Result<M, FormatError> {
        let decoded = self.encoder.decode(stored).and_then(|payload| {
            let envelope = Envelope::parse(&payload)?;
            let model = M::decode(envelope.payload)?;
            Ok((envelope.version, model))
        });
        let (version, mut model) = decoded.map_err(|e| read_failure(stored, e))?;
        model.migrate_from_version(version)?;
        model.validate()?;
        Ok(model)
    }
}

/// Log a read-path failure with the label of the key the value names, when
/// the frame is intact enough to carry one.
fn read_failure(stored: &[u8], error: FormatError) -> FormatError {
    let key_label = peek_key_label(stored).ok();
    tracing::warn!(key_label = ?key_label, error = %error, "failed to unmarshal record");
    error
}
