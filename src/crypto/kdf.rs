use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{KEY_LEN, MIN_KEY_LEN, MIN_SALT_LEN, SALT_LEN};
use crate::error::{CredentialError, Result};

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 65_536;

/// Cost and size parameters for newly produced credential records.
///
/// Verification never consults these: it uses whatever the stored record
/// carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    iterations: u32,
    salt_len: usize,
    key_len: usize,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            salt_len: SALT_LEN,
            key_len: KEY_LEN,
        }
    }
}

impl HashParams {
    pub fn new(iterations: u32, salt_len: usize, key_len: usize) -> Result<Self> {
        let params = Self {
            iterations,
            salt_len,
            key_len,
        };
        params.validate()?;
        Ok(params)
    }

    /// Default sizes with a different iteration count.
    pub fn with_iterations(iterations: u32) -> Result<Self> {
        Self::new(iterations, SALT_LEN, KEY_LEN)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(CredentialError::InvalidParams(
                "pbkdf2 iterations must be >= 1".into(),
            ));
        }
        if self.salt_len < MIN_SALT_LEN {
            return Err(CredentialError::InvalidParams(format!(
                "salt must be at least {MIN_SALT_LEN} bytes"
            )));
        }
        if self.key_len < MIN_KEY_LEN {
            return Err(CredentialError::InvalidParams(format!(
                "derived key must be at least {MIN_KEY_LEN} bytes"
            )));
        }
        Ok(())
    }
}

/// Derive `key_len` bytes from a password with PBKDF2-HMAC-SHA256.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if iterations == 0 {
        return Err(CredentialError::unavailable(
            "pbkdf2 iteration count is zero",
            "rounds must be non-zero",
        ));
    }

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, key.as_mut_slice()).map_err(
        |e| CredentialError::unavailable("pbkdf2-hmac-sha256 key derivation failed", e.to_string()),
    )?;

    Ok(key)
}
