use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key configuration: {0}")]
    Configuration(String),

    #[error("Random number generation failed: {0}")]
    Randomness(String),

    #[error("Cannot construct AES-GCM for key {label:?}: {reason}")]
    CipherConstruction { label: String, reason: String },

    #[error("Key not found: {0:?}")]
    KeyNotFound(String),

    #[error("Message authentication failed")]
    Authentication,
}
