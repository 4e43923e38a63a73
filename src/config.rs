//! Encryption key configuration.
//!
//! Keys arrive either from the JSON config file:
//!
//! ```json
//! {
//!   "active_key_label": "key-2",
//!   "encryption_keys": { "key-1": "phrase one", "key-2": "phrase two" }
//! }
//! ```
//!
//! or as `label:passphrase` command-line flags plus an active label. Either way
//! the result is one `KeyManager`; passphrases never leave this module.

use std::collections::BTreeMap;
use std::fmt;

use bbs_crypto::{CryptoError, Cryptor, Key, KeyManager};
use bbs_format::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Label of the key new records are encrypted with.
    #[serde(default)]
    pub active_key_label: String,
    /// label → passphrase for every key records may be encrypted with.
    #[serde(default)]
    pub encryption_keys: BTreeMap<String, String>,
}

impl EncryptionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a config from `label:passphrase` flags. Each flag is split on its
    /// first `:`, so passphrases may themselves contain colons. A label given
    /// twice keeps its last passphrase.
    pub fn from_flags<S: AsRef<str>>(
        flags: &[S],
        active_key_label: &str,
    ) -> Result<Self, ConfigError> {
        let mut encryption_keys = BTreeMap::new();
        for (index, flag) in flags.iter().enumerate() {
            let (label, passphrase) = flag
                .as_ref()
                .split_once(':')
                .ok_or(ConfigError::MalformedKey(index))?;
            encryption_keys.insert(label.to_string(), passphrase.to_string());
        }
        Ok(Self {
            active_key_label: active_key_label.to_string(),
            encryption_keys,
        })
    }

    pub fn key_manager(&self) -> Result<KeyManager, ConfigError> {
        if self.encryption_keys.is_empty() {
            return Err(configuration("Must have at least one encryption key set"));
        }
        if self.active_key_label.is_empty() {
            return Err(configuration("Must select an active encryption key"));
        }

        let mut active = None;
        let mut others = Vec::with_capacity(self.encryption_keys.len());
        for (label, passphrase) in &self.encryption_keys {
            let key = Key::new(label, passphrase)?;
            if *label == self.active_key_label {
                active = Some(key);
            } else {
                others.push(key);
            }
        }

        if active.is_none() {
            return Err(configuration(&format!(
                "The selected active key {:?} must be listed among the encryption keys",
                self.active_key_label
            )));
        }
        Ok(KeyManager::new(active, others)?)
    }

    /// A cryptor over these keys, drawing nonces from the OS CSPRNG.
    pub fn cryptor(&self) -> Result<Cryptor, ConfigError> {
        Ok(Cryptor::with_os_entropy(self.key_manager()?))
    }

    pub fn serializer(&self) -> Result<Serializer, ConfigError> {
        Ok(Serializer::new(self.cryptor()?))
    }
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("active_key_label", &self.active_key_label)
            .field("encryption_keys", &self.encryption_keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn configuration(message: &str) -> ConfigError {
    ConfigError::Crypto(CryptoError::Configuration(message.to_string()))
}
