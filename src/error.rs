//! Error types for credential hashing, record parsing and password policy.

use std::error::Error as StdError;

/// Result alias used across the library.
pub type Result<T, E = CredentialError> = std::result::Result<T, E>;

/// Errors returned by [`CredentialHasher`](crate::CredentialHasher).
///
/// A wrong password is never an error: `verify` returns `Ok(false)` for it.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The key-derivation primitive or the secure random source could not be
    /// used. Not retryable.
    #[error("credential derivation unavailable: {context}")]
    DerivationUnavailable {
        context: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The stored record could not be parsed.
    #[error("corrupt credential record: {0}")]
    CorruptRecord(#[from] RecordError),

    /// Hashing parameters are out of range.
    #[error("invalid hash parameters: {0}")]
    InvalidParams(String),
}

impl CredentialError {
    pub(crate) fn unavailable(
        context: &'static str,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        CredentialError::DerivationUnavailable {
            context,
            source: source.into(),
        }
    }
}

/// Ways an encoded `iterations:salt:key` record can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("expected 3 colon-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("iteration count '{0}' is not a positive integer")]
    InvalidIterations(String),

    #[error("salt is not valid base64: {0}")]
    InvalidSalt(base64::DecodeError),

    #[error("derived key is not valid base64: {0}")]
    InvalidKey(base64::DecodeError),

    #[error("derived key is empty")]
    EmptyKey,
}

/// Errors raised while building a [`PasswordPolicy`](crate::PasswordPolicy).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("symbol set cannot be empty")]
    EmptySymbols,

    #[error("'{0}' cannot be used as a symbol")]
    InvalidSymbol(char),

    #[error("minimum length must be at least 1")]
    ZeroLength,
}
