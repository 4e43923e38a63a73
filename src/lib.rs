//! BBS record codec.
//!
//! Every record the store persists is framed in a versioned envelope and
//! encrypted under the active key before it reaches the backing store:
//!
//! record → protobuf → [format][version] header → AES-256-GCM → labelled frame → base64
//!
//! Key rotation installs a new `KeyManager` in the cryptor's `KeyRing`; values
//! written under a retired key stay readable for as long as its label remains
//! registered, and `Serializer::reencrypt_all` moves them to the active key.

pub mod config;
pub mod error;
pub mod models;

pub use bbs_crypto::{
    BlockCipher, CryptoError, Cryptor, Encrypted, EntropySource, FixedEntropy, Key, KeyManager,
    KeyRing, OsEntropy,
};
pub use bbs_format::{
    marshal_envelope, unmarshal_envelope, Encoder, ErrorKind, FormatError, ModelError,
    ProtoVersioner, ReencryptionReport, Serializer, Version, Versioner,
};
pub use config::EncryptionConfig;
pub use error::ConfigError;
