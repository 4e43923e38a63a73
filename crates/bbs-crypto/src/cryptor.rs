//! AES-256-GCM sealing under the active key of a rotatable key set.
//!
//! Every call captures one `KeyManager` snapshot from the ring and uses it
//! throughout, so a concurrent rotation never splits an operation across two
//! key sets. A fresh 12-byte nonce is drawn per encryption; no AAD is bound.

use std::fmt;
use std::sync::Arc;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::entropy::{read_full, EntropySource, OsEntropy};
use crate::error::CryptoError;
use crate::key::Key;
use crate::key_manager::{KeyManager, KeyRing};
use crate::types::{Encrypted, GCM_BLOCK_SIZE, NONCE_SIZE};

/// Build the AEAD for a key, rejecting ciphers GCM cannot run on.
fn build_cipher(key: &Key) -> Result<Aes256Gcm, CryptoError> {
    let block_size = key.cipher().block_size();
    if block_size != GCM_BLOCK_SIZE {
        return Err(CryptoError::CipherConstruction {
            label: key.label().to_string(),
            reason: format!(
                "{} has a {}-byte block, GCM requires {}",
                key.cipher().name(),
                block_size,
                GCM_BLOCK_SIZE
            ),
        });
    }
    Aes256Gcm::new_from_slice(key.material()).map_err(|e| CryptoError::CipherConstruction {
        label: key.label().to_string(),
        reason: e.to_string(),
    })
}

/// Authenticated encryption bound to a key ring and a randomness source.
///
/// Cheap to clone; clones share the ring, so a rotation through one is seen
/// by all of them.
#[derive(Clone)]
pub struct Cryptor {
    keys: Arc<KeyRing>,
    entropy: Arc<dyn EntropySource>,
}

impl Cryptor {
    pub fn new(manager: KeyManager, entropy: impl EntropySource + 'static) -> Self {
        Self::from_ring(Arc::new(KeyRing::new(manager)), Arc::new(entropy))
    }

    /// A cryptor drawing nonces from the operating system CSPRNG.
    pub fn with_os_entropy(manager: KeyManager) -> Self {
        Self::new(manager, OsEntropy)
    }

    pub fn from_ring(keys: Arc<KeyRing>, entropy: Arc<dyn EntropySource>) -> Self {
        Self { keys, entropy }
    }

    /// The key set currently in effect.
    pub fn key_manager(&self) -> Arc<KeyManager> {
        self.keys.snapshot()
    }

    /// Install a new key set. Returns the one it replaced.
    pub fn rotate(&self, manager: KeyManager) -> Arc<KeyManager> {
        self.keys.install(manager)
    }

    /// Seal `plaintext` under the active key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Encrypted, CryptoError> {
        let keys = self.keys.snapshot();
        let key = keys.encryption_key();
        let cipher = build_cipher(key)?;

        let mut nonce = [0u8; NONCE_SIZE];
        read_full(self.entropy.as_ref(), &mut nonce)?;

        let cipher_text = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CryptoError::CipherConstruction {
                label: key.label().to_string(),
                reason: "plaintext exceeds the GCM message limit".to_string(),
            })?;

        Ok(Encrypted {
            key_label: key.label().to_string(),
            nonce,
            cipher_text,
        })
    }

    /// Open a sealed value with whichever registered key it names.
    ///
    /// Returns no plaintext unless the tag verifies.
    pub fn decrypt(&self, encrypted: &Encrypted) -> Result<Vec<u8>, CryptoError> {
        let keys = self.keys.snapshot();
        let key = keys
            .decryption_key(&encrypted.key_label)
            .ok_or_else(|| CryptoError::KeyNotFound(encrypted.key_label.clone()))?;
        let cipher = build_cipher(key)?;

        cipher
            .decrypt(
                Nonce::from_slice(&encrypted.nonce),
                encrypted.cipher_text.as_slice(),
            )
            .map_err(|_| CryptoError::Authentication)
    }
}

impl fmt::Debug for Cryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cryptor")
            .field("keys", &self.keys.snapshot().labels())
            .finish_non_exhaustive()
    }
}
