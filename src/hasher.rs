//! Salted PBKDF2-HMAC-SHA256 password hashing and verification.

use crate::crypto::{self, HashParams};
use crate::error::Result;
use crate::record::CredentialRecord;

/// Produces and checks `iterations:salt:key` credential records.
///
/// The hasher holds only its parameters, so one instance can be shared
/// freely across threads. Each call draws its own salt and key buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CredentialHasher {
    params: HashParams,
}

impl CredentialHasher {
    pub fn new(params: HashParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HashParams {
        &self.params
    }

    /// Hashes a password into a new encoded record with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`DerivationUnavailable`](crate::CredentialError::DerivationUnavailable)
    /// if the random source or key derivation cannot be used.
    pub fn hash(&self, password: &str) -> Result<String> {
        self.hash_record(password).map(|record| record.to_string())
    }

    /// Like [`hash`](Self::hash) but returns the typed record.
    pub fn hash_record(&self, password: &str) -> Result<CredentialRecord> {
        let salt = crypto::generate_salt(self.params.salt_len())?;
        let key = crypto::derive_key(
            password.as_bytes(),
            &salt,
            self.params.iterations(),
            self.params.key_len(),
        )?;

        tracing::debug!(
            iterations = self.params.iterations(),
            key_len = self.params.key_len(),
            "derived credential record"
        );

        Ok(CredentialRecord::new(self.params.iterations(), salt, key))
    }

    /// Checks a password against a stored record.
    ///
    /// The record's own iteration count and key length are used, so records
    /// made under older parameters stay verifiable.
    ///
    /// # Errors
    ///
    /// Returns [`CorruptRecord`](crate::CredentialError::CorruptRecord) if
    /// `stored` is malformed. A wrong password is `Ok(false)`, not an error.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool> {
        let record = CredentialRecord::parse(stored)?;
        self.verify_record(password, &record)
    }

    pub fn verify_record(&self, password: &str, record: &CredentialRecord) -> Result<bool> {
        let candidate = crypto::derive_key(
            password.as_bytes(),
            record.salt(),
            record.iterations(),
            record.key().len(),
        )?;

        tracing::debug!(
            iterations = record.iterations(),
            key_len = record.key().len(),
            "verified credential record"
        );

        Ok(crypto::constant_time_eq(record.key(), &candidate))
    }

    /// Returns `true` if `stored` was made with weaker parameters than this
    /// hasher's, so it should be replaced after the next successful verify.
    pub fn needs_rehash(&self, stored: &str) -> Result<bool> {
        let record = CredentialRecord::parse(stored)?;
        Ok(self.record_needs_rehash(&record))
    }

    pub fn record_needs_rehash(&self, record: &CredentialRecord) -> bool {
        record.iterations() < self.params.iterations()
            || record.salt().len() < self.params.salt_len()
            || record.key().len() < self.params.key_len()
    }
}

/// Hashes a password with the default parameters.
pub fn hash_password(password: &str) -> Result<String> {
    CredentialHasher::default().hash(password)
}

/// Verifies a password against a stored record.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    CredentialHasher::default().verify(password, stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CredentialError, RecordError};
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    fn fast() -> CredentialHasher {
        CredentialHasher::new(HashParams::with_iterations(1_000).unwrap())
    }

    #[test]
    fn hash_verify_roundtrip() {
        let hasher = fast();
        let stored = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &stored).unwrap());
    }

    #[test]
    fn wrong_password_is_false() {
        let hasher = fast();
        let stored = hasher.hash("correct horse").unwrap();
        assert!(!hasher.verify("correct horsf", &stored).unwrap());
        assert!(!hasher.verify("", &stored).unwrap());
    }

    #[test]
    fn verify_is_repeatable() {
        let hasher = fast();
        let stored = hasher.hash("pw").unwrap();
        for _ in 0..3 {
            assert!(hasher.verify("pw", &stored).unwrap());
            assert!(!hasher.verify("px", &stored).unwrap());
        }
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let hasher = fast();
        let a = hasher.hash_record("pw").unwrap();
        let b = hasher.hash_record("pw").unwrap();

        assert_eq!(a.iterations(), b.iterations());
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.key(), b.key());
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn default_record_format() {
        let stored = hash_password("Tr0ub4dor&3").unwrap();
        let fields: Vec<&str> = stored.split(':').collect();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].parse::<u32>().unwrap(), 65_536);
        assert_eq!(STANDARD.decode(fields[1]).unwrap().len(), 16);
        assert_eq!(STANDARD.decode(fields[2]).unwrap().len(), 32);

        assert!(verify_password("Tr0ub4dor&3", &stored).unwrap());
        assert!(!verify_password("wrongpass", &stored).unwrap());
    }

    #[test]
    fn verify_honours_embedded_iterations_and_length() {
        let salt = [9u8; 16];
        let key = crypto::derive_key(b"legacy", &salt, 1_000, 20).unwrap();
        let stored = format!("1000:{}:{}", STANDARD.encode(salt), STANDARD.encode(&*key));

        // the default hasher uses 65536 iterations and 32-byte keys
        assert!(CredentialHasher::default().verify("legacy", &stored).unwrap());
        assert!(!CredentialHasher::default().verify("legacy!", &stored).unwrap());
    }

    #[test]
    fn malformed_record_is_an_error_not_false() {
        let stored = fast().hash("pw").unwrap();
        let truncated = stored.rsplit_once(':').unwrap().0;

        match fast().verify("pw", truncated) {
            Err(CredentialError::CorruptRecord(RecordError::FieldCount { found })) => {
                assert_eq!(found, 2)
            }
            other => panic!("expected CorruptRecord, got: {other:?}"),
        }
    }

    #[test]
    fn needs_rehash_detects_weaker_records() {
        let old = fast().hash("pw").unwrap();
        let current = CredentialHasher::new(HashParams::with_iterations(2_000).unwrap());

        assert!(current.needs_rehash(&old).unwrap());
        assert!(!fast().needs_rehash(&old).unwrap());

        let short_key = format!(
            "2000:{}:{}",
            STANDARD.encode([0u8; 16]),
            STANDARD.encode([1u8; 16])
        );
        assert!(current.needs_rehash(&short_key).unwrap());
        assert!(current.needs_rehash("bogus").is_err());
    }

    #[test]
    fn hasher_is_shareable_across_threads() {
        let hasher = fast();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let pw = format!("pw-{i}");
                    let stored = hasher.hash(&pw).unwrap();
                    hasher.verify(&pw, &stored).unwrap()
                })
            })
            .collect();

        for h in handles {
            assert!(h.join().unwrap());
        }
    }
}
