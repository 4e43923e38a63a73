//! Record encryption for the BBS: labelled keys, rotatable key sets, AES-256-GCM.

pub mod cryptor;
pub mod entropy;
pub mod error;
pub mod key;
pub mod key_manager;
pub mod types;

pub use cryptor::Cryptor;
pub use entropy::{EntropySource, FixedEntropy, OsEntropy};
pub use error::CryptoError;
pub use key::{BlockCipher, Key};
pub use key_manager::{KeyManager, KeyRing};
pub use types::{Encrypted, AES_KEY_LENGTH, GCM_BLOCK_SIZE, MAX_LABEL_LENGTH, NONCE_SIZE, TAG_SIZE};
