//! Randomness sources for nonce generation.

use std::io;

use parking_lot::Mutex;

use crate::error::CryptoError;

/// A source of random bytes shared by concurrent callers.
///
/// Follows `io::Read` semantics through a shared reference: returns the number
/// of bytes written, and `Ok(0)` once the source is exhausted.
pub trait EntropySource: Send + Sync {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        getrandom::getrandom(buf).map_err(|e| io::Error::other(e.to_string()))?;
        Ok(buf.len())
    }
}

/// Serves a fixed byte string, then reports exhaustion.
///
/// Deterministic; meant for tests and for reproducing stored fixtures.
#[derive(Debug, Default)]
pub struct FixedEntropy {
    remaining: Mutex<Vec<u8>>,
}

impl FixedEntropy {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            remaining: Mutex::new(bytes.into()),
        }
    }
}

impl EntropySource for FixedEntropy {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut remaining = self.remaining.lock();
        let n = buf.len().min(remaining.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        remaining.drain(..n);
        Ok(n)
    }
}

/// Fill `buf` completely from `source`.
///
/// An exhausted source fails with `Randomness`; the message tells an empty
/// source apart from one that ran dry partway.
pub(crate) fn read_full(source: &dyn EntropySource, buf: &mut [u8]) -> Result<(), CryptoError> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CryptoError::Randomness(e.to_string())),
        }
    }

    match filled {
        n if n == buf.len() => Ok(()),
        0 => Err(CryptoError::Randomness(
            "source exhausted before any bytes were read (EOF)".to_string(),
        )),
        n => Err(CryptoError::Randomness(format!(
            "short read: got {} of {} bytes (unexpected EOF)",
            n,
            buf.len()
        ))),
    }
}
