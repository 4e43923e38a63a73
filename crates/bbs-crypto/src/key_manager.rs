//! Immutable key registry and the swappable ring that holds it.
//!
//! A `KeyManager` is never mutated once built. Rotation builds a new manager
//! and installs it in the `KeyRing`; operations already holding a snapshot
//! finish against the key set they started with.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::CryptoError;
use crate::key::Key;

/// Known keys plus the one used for new encryptions.
#[derive(Debug, Clone)]
pub struct KeyManager {
    active_label: String,
    keys: HashMap<String, Key>,
}

impl KeyManager {
    /// Build a manager from an active key and any number of decryption-only
    /// keys. A key in `others` sharing the active key's label is shadowed by
    /// the active key.
    pub fn new(active: Option<Key>, others: Vec<Key>) -> Result<Self, CryptoError> {
        let active = active
            .ok_or_else(|| CryptoError::Configuration("no active key supplied".to_string()))?;

        let mut keys: HashMap<String, Key> = others
            .into_iter()
            .map(|key| (key.label().to_string(), key))
            .collect();
        let active_label = active.label().to_string();
        keys.insert(active_label.clone(), active);

        Ok(Self { active_label, keys })
    }

    /// The key new records are encrypted with.
    pub fn encryption_key(&self) -> &Key {
        // Construction inserts the active key, and the map is never mutated.
        &self.keys[&self.active_label]
    }

    /// Any registered key, the active one included.
    pub fn decryption_key(&self, label: &str) -> Option<&Key> {
        self.keys.get(label)
    }

    /// Registered labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: a manager holds at least its active key. Present to
    /// pair with `len`.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A new manager with `new_active` as the encryption key. The current
    /// active key is demoted and stays available for decryption.
    pub fn rotate_to(&self, new_active: Key) -> KeyManager {
        let mut keys = self.keys.clone();
        let active_label = new_active.label().to_string();
        keys.insert(active_label.clone(), new_active);
        KeyManager { active_label, keys }
    }

    /// A new manager without `label`. Records sealed under it stop decrypting.
    pub fn retire(&self, label: &str) -> Result<KeyManager, CryptoError> {
        if label == self.active_label {
            return Err(CryptoError::Configuration(format!(
                "cannot retire the active key {:?}",
                label
            )));
        }
        let mut keys = self.keys.clone();
        keys.remove(label);
        Ok(KeyManager {
            active_label: self.active_label.clone(),
            keys,
        })
    }
}

/// Holder of the current `KeyManager` snapshot.
///
/// The lock is held only to clone or replace the `Arc`, never across a
/// cryptographic operation.
#[derive(Debug)]
pub struct KeyRing {
    current: RwLock<Arc<KeyManager>>,
}

impl KeyRing {
    pub fn new(manager: KeyManager) -> Self {
        Self {
            current: RwLock::new(Arc::new(manager)),
        }
    }

    /// The key set in effect right now.
    pub fn snapshot(&self) -> Arc<KeyManager> {
        Arc::clone(&self.current.read())
    }

    /// Replace the key set. Returns the snapshot that was in effect.
    pub fn install(&self, manager: KeyManager) -> Arc<KeyManager> {
        let next = Arc::new(manager);
        tracing::info!(
            active_key = next.encryption_key().label(),
            keys = next.len(),
            "installing key set"
        );
        std::mem::replace(&mut *self.current.write(), next)
    }
}
