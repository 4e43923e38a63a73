//! The contract every persisted model satisfies.
//!
//! The envelope's version byte is pinned at `V0`; schema changes are absorbed
//! by `migrate_from_version`, which models call after decoding.

use std::fmt;

use thiserror::Error;

/// Envelope version byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u8);

pub const V0: Version = Version(0);

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{}", join_fields(.0))]
    Invalid(Vec<FieldError>),

    #[error("Cannot migrate from {from}: {reason}")]
    Migration { from: Version, reason: String },
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collects field failures so `validate` reports all of them at once.
#[derive(Debug, Default)]
pub struct Validation {
    errors: Vec<FieldError>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &'static str, reason: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(FieldError {
                field,
                reason: reason.into(),
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ModelError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Invalid(self.errors))
        }
    }
}

/// Versioning hooks for persisted models.
pub trait Versioner {
    /// The version this model writes. Defaults to `V0`.
    fn version(&self) -> Version {
        V0
    }

    fn validate(&self) -> Result<(), ModelError>;

    /// Reinterpret a value decoded from data written at `from`.
    ///
    /// No model migrates today; the default accepts every version unchanged.
    fn migrate_from_version(&mut self, from: Version) -> Result<(), ModelError> {
        let _ = from;
        Ok(())
    }
}

/// A model that can pass through the envelope: protobuf-serializable and
/// versioned.
pub trait ProtoVersioner: prost::Message + Default + Versioner {}

impl<T: prost::Message + Default + Versioner> ProtoVersioner for T {}
