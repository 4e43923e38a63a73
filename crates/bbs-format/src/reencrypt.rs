//! Rewriting stored values under the active key after a rotation.
//!
//! A retired key can only be dropped from the key set once no stored value
//! names it. These helpers decode under whichever key a value names and encode
//! again under the active key, leaving the envelope bytes untouched.

use crate::encoder::{peek_key_label, Encoder};
use crate::error::FormatError;
use crate::serializer::Serializer;

/// Outcome of re-encrypting a batch of stored values.
#[derive(Debug, Default)]
pub struct ReencryptionReport {
    /// (id, new stored value) for every value that was rewritten.
    pub rewritten: Vec<(String, Vec<u8>)>,
    /// Number of values already under the active key.
    pub unchanged: usize,
    /// (id, error) for every value that could not be rewritten.
    pub failed: Vec<(String, FormatError)>,
}

impl ReencryptionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Encoder {
    /// Whether `stored` was sealed under a key other than the active one.
    pub fn needs_reencryption(&self, stored: &[u8]) -> Result<bool, FormatError> {
        let label = peek_key_label(stored)?;
        Ok(label != self.cryptor().key_manager().encryption_key().label())
    }

    /// Decode `stored` and encode it again under the active key.
    pub fn reencrypt(&self, stored: &[u8]) -> Result<Vec<u8>, FormatError> {
        let payload = self.decode(stored)?;
        self.encode(&payload)
    }

    /// Re-encrypt every value not already under the active key.
    ///
    /// The active label is read once, so a rotation during the batch leaves
    /// the report describing the key set the batch started with.
    pub fn reencrypt_all(&self, records: &[(String, Vec<u8>)]) -> ReencryptionReport {
        let keys = self.cryptor().key_manager();
        let active = keys.encryption_key().label();
        let mut report = ReencryptionReport::default();

        for (id, stored) in records {
            let result = peek_key_label(stored).and_then(|label| {
                if label == active {
                    Ok(None)
                } else {
                    self.reencrypt(stored).map(Some)
                }
            });
            match result {
                Ok(Some(rewritten)) => report.rewritten.push((id.clone(), rewritten)),
                Ok(None) => report.unchanged += 1,
                Err(e) => {
                    tracing::warn!(record = %id, error = %e, "failed to re-encrypt record");
                    report.failed.push((id.clone(), e));
                }
            }
        }

        tracing::debug!(
            active_key = active,
            rewritten = report.rewritten.len(),
            unchanged = report.unchanged,
            failed = report.failed.len(),
            "re-encrypted records"
        );
        report
    }
}

impl Serializer {
    pub fn needs_reencryption(&self, stored: &[u8]) -> Result<bool, FormatError> {
        self.encoder().needs_reencryption(stored)
    }

    pub fn reencrypt(&self, stored: &[u8]) -> Result<Vec<u8>, FormatError> {
        self.encoder().reencrypt(stored)
    }

    pub fn reencrypt_all(&self, records: &[(String, Vec<u8>)]) -> ReencryptionReport {
        self.encoder().reencrypt_all(records)
    }
}
