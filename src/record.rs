//! Textual credential record.
//!
//! Record format:
//! ```text
//! ITERATIONS (decimal) : SALT (base64, standard alphabet) : DERIVED KEY (base64, standard alphabet)
//! ```
//!
//! The alphabet is the padded standard one so that records produced
//! elsewhere with the same scheme parse unchanged.

use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use zeroize::Zeroizing;

use crate::error::RecordError;

/// Field separator.
pub const SEPARATOR: char = ':';

/// A parsed `iterations:salt:key` record.
///
/// Records are values: verification reads them and never rewrites them.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    iterations: u32,
    salt: Vec<u8>,
    key: Zeroizing<Vec<u8>>,
}

impl CredentialRecord {
    pub(crate) fn new(iterations: u32, salt: Vec<u8>, key: Zeroizing<Vec<u8>>) -> Self {
        Self {
            iterations,
            salt,
            key,
        }
    }

    /// Parses an encoded record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the record does not have exactly three fields
    /// - the iteration count is not a positive integer
    /// - the salt or key is not standard base64
    /// - the key is empty
    pub fn parse(encoded: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = encoded.split(SEPARATOR).collect();
        let &[iterations, salt, key] = fields.as_slice() else {
            return Err(RecordError::FieldCount {
                found: fields.len(),
            });
        };

        let iterations = match iterations.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(RecordError::InvalidIterations(iterations.to_string())),
        };

        let salt = STANDARD.decode(salt).map_err(RecordError::InvalidSalt)?;
        let key = Zeroizing::new(STANDARD.decode(key).map_err(RecordError::InvalidKey)?);

        if key.is_empty() {
            return Err(RecordError::EmptyKey);
        }

        Ok(Self::new(iterations, salt, key))
    }

    /// Returns the PBKDF2 iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Returns the raw salt bytes.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the derived key bytes.
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl FromStr for CredentialRecord {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.iterations,
            STANDARD.encode(&self.salt),
            STANDARD.encode(self.key.as_slice())
        )
    }
}

// Keep key material out of debug output.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("iterations", &self.iterations)
            .field("salt_len", &self.salt.len())
            .field("key_len", &self.key.len())
            .finish()
    }
}
