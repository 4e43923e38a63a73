use bbs_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed encryption key #{0}: expected label:passphrase")]
    MalformedKey(usize),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
