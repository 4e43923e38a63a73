//! Storage encoding: encrypt, frame, base64.
//!
//! Stored value: base64([label_len:1][label][nonce:12][ciphertext+tag])
//! The label tells readers which key sealed the record, so records written
//! under different keys can sit side by side during a rotation.

use base64ct::{Base64, Encoding};
use bbs_crypto::{Cryptor, Encrypted, NONCE_SIZE};

use crate::error::FormatError;

/// Lay out an encryption result as the binary frame.
pub fn frame(encrypted: &Encrypted) -> Result<Vec<u8>, FormatError> {
    let label = encrypted.key_label.as_bytes();
    let label_len = u8::try_from(label.len()).map_err(|_| {
        FormatError::FormatIncompatible(format!(
            "key label is {} bytes, a frame holds at most {}",
            label.len(),
            u8::MAX
        ))
    })?;

    let mut frame = Vec::with_capacity(1 + label.len() + NONCE_SIZE + encrypted.cipher_text.len());
    frame.push(label_len);
    frame.extend_from_slice(label);
    frame.extend_from_slice(&encrypted.nonce);
    frame.extend_from_slice(&encrypted.cipher_text);
    Ok(frame)
}

/// Split a binary frame back into its parts without decrypting anything.
pub fn parse_frame(frame: &[u8]) -> Result<Encrypted, FormatError> {
    let (&label_len, rest) = frame
        .split_first()
        .ok_or_else(|| FormatError::FormatIncompatible("empty frame".to_string()))?;
    let label_len = usize::from(label_len);
    if rest.len() < label_len {
        return Err(FormatError::FormatIncompatible(format!(
            "label length {} exceeds the {} bytes remaining",
            label_len,
            rest.len()
        )));
    }
    let (label, rest) = rest.split_at(label_len);
    if rest.len() < NONCE_SIZE {
        return Err(FormatError::FormatIncompatible(format!(
            "{} bytes remain after the label, shorter than the {}-byte nonce",
            rest.len(),
            NONCE_SIZE
        )));
    }
    let (nonce, cipher_text) = rest.split_at(NONCE_SIZE);

    let key_label = std::str::from_utf8(label)
        .map_err(|e| FormatError::FormatIncompatible(format!("key label is not UTF-8: {}", e)))?
        .to_string();
    let nonce: [u8; NONCE_SIZE] = nonce
        .try_into()
        .map_err(|_| FormatError::FormatIncompatible("malformed nonce".to_string()))?;

    Ok(Encrypted {
        key_label,
        nonce,
        cipher_text: cipher_text.to_vec(),
    })
}

fn decode_base64(stored: &[u8]) -> Result<Vec<u8>, FormatError> {
    let text = std::str::from_utf8(stored).map_err(|_| {
        FormatError::FormatIncompatible("stored value is not base64 text".to_string())
    })?;
    Base64::decode_vec(text)
        .map_err(|e| FormatError::FormatIncompatible(format!("invalid base64: {}", e)))
}

/// Read the label of the key a stored value was sealed under.
pub fn peek_key_label(stored: &[u8]) -> Result<String, FormatError> {
    Ok(parse_frame(&decode_base64(stored)?)?.key_label)
}

/// Encrypts envelope bytes into storage-safe values and back.
#[derive(Debug, Clone)]
pub struct Encoder {
    cryptor: Cryptor,
}

impl Encoder {
    pub fn new(cryptor: Cryptor) -> Self {
        Self { cryptor }
    }

    pub fn cryptor(&self) -> &Cryptor {
        &self.cryptor
    }

    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, FormatError> {
        let encrypted = self.cryptor.encrypt(payload)?;
        let frame = frame(&encrypted)?;
        Ok(Base64::encode_string(&frame).into_bytes())
    }

    /// Malformed values are rejected before any key is touched.
    pub fn decode(&self, stored: &[u8]) -> Result<Vec<u8>, FormatError> {
        let encrypted = parse_frame(&decode_base64(stored)?)?;
        Ok(self.cryptor.decrypt(&encrypted)?)
    }
}
