//! Labelled symmetric keys.
//!
//! Key material is derived as SHA-256(passphrase) and used as an AES-256 key,
//! so every process given the same label and passphrase derives the same key
//! without raw key bytes ever leaving configuration.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::types::{GCM_BLOCK_SIZE, MAX_LABEL_LENGTH};

/// Block cipher a key's material belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCipher {
    /// AES with a 256-bit key. The only cipher GCM can be built on here.
    Aes256,
    /// Triple DES (EDE3), 8-byte blocks. A tag only: no 3DES implementation
    /// sits behind it and keys carrying it cannot encrypt or decrypt. It
    /// names a cipher GCM cannot run on, which `Aes256Gcm` otherwise rules
    /// out at compile time, so the block-size check has something to reject.
    TripleDes,
}

impl BlockCipher {
    pub fn block_size(self) -> usize {
        match self {
            BlockCipher::Aes256 => GCM_BLOCK_SIZE,
            BlockCipher::TripleDes => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockCipher::Aes256 => "AES-256",
            BlockCipher::TripleDes => "3DES",
        }
    }
}

/// A named symmetric key.
#[derive(Clone)]
pub struct Key {
    label: String,
    cipher: BlockCipher,
    material: Zeroizing<Vec<u8>>,
}

impl Key {
    /// Derive an AES-256 key from a passphrase.
    ///
    /// The passphrase may be empty; only the label is validated.
    pub fn new(label: &str, passphrase: &str) -> Result<Self, CryptoError> {
        validate_label(label)?;
        let digest = Sha256::digest(passphrase.as_bytes());
        Ok(Self {
            label: label.to_string(),
            cipher: BlockCipher::Aes256,
            material: Zeroizing::new(digest.to_vec()),
        })
    }

    /// Build a key from raw material for the given block cipher.
    pub fn with_cipher(
        label: &str,
        cipher: BlockCipher,
        material: &[u8],
    ) -> Result<Self, CryptoError> {
        validate_label(label)?;
        Ok(Self {
            label: label.to_string(),
            cipher,
            material: Zeroizing::new(material.to_vec()),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cipher(&self) -> BlockCipher {
        self.cipher
    }

    pub(crate) fn material(&self) -> &[u8] {
        &self.material
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("label", &self.label)
            .field("cipher", &self.cipher.name())
            .finish_non_exhaustive()
    }
}

fn validate_label(label: &str) -> Result<(), CryptoError> {
    if label.is_empty() {
        return Err(CryptoError::Configuration("A key label is required".to_string()));
    }
    if label.len() > MAX_LABEL_LENGTH {
        return Err(CryptoError::Configuration(format!(
            "Key label is {} bytes, at most {} are allowed",
            label.len(),
            MAX_LABEL_LENGTH
        )));
    }
    Ok(())
}
