use bbs_crypto::CryptoError;
use thiserror::Error;

use crate::versioner::ModelError;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Format incompatible: {0}")]
    FormatIncompatible(String),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Invalid model: {0}")]
    Invalid(#[from] ModelError),
}

/// Flat classification of every codec failure, for callers that branch on
/// the kind of error rather than on its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Randomness,
    CipherConstruction,
    KeyNotFound,
    Authentication,
    FormatIncompatible,
    Decode,
    Invalid,
}

impl FormatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormatError::Crypto(e) => match e {
                CryptoError::Configuration(_) => ErrorKind::Configuration,
                CryptoError::Randomness(_) => ErrorKind::Randomness,
                CryptoError::CipherConstruction { .. } => ErrorKind::CipherConstruction,
                CryptoError::KeyNotFound(_) => ErrorKind::KeyNotFound,
                CryptoError::Authentication => ErrorKind::Authentication,
            },
            FormatError::FormatIncompatible(_) => ErrorKind::FormatIncompatible,
            FormatError::Decode(_) => ErrorKind::Decode,
            FormatError::Invalid(_) => ErrorKind::Invalid,
        }
    }
}
