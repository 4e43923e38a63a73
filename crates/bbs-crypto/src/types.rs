/// AES-GCM nonce length in bytes (96 bits per NIST recommendation).
pub const NONCE_SIZE: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const TAG_SIZE: usize = 16;

/// AES-256 key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// Block size GCM requires of its underlying cipher.
pub const GCM_BLOCK_SIZE: usize = 16;

/// Longest label a key may carry. The stored frame records the label
/// length in a single byte.
pub const MAX_LABEL_LENGTH: usize = u8::MAX as usize;

/// Output of one encryption: the label of the key that sealed it, the nonce,
/// and the ciphertext with the GCM tag appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub key_label: String,
    pub nonce: [u8; NONCE_SIZE],
    pub cipher_text: Vec<u8>,
}
