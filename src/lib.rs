//! Salted PBKDF2 credential hashing with a password policy and a security
//! event log.
//!
//! ```rust
//! use credhash::{CredentialHasher, HashParams, PasswordPolicy};
//!
//! let policy = PasswordPolicy::default();
//! assert!(policy.is_strong("Tr0ub4dor&3"));
//!
//! let hasher = CredentialHasher::new(HashParams::with_iterations(1_000).unwrap());
//! let stored = hasher.hash("Tr0ub4dor&3").unwrap();
//!
//! assert!(hasher.verify("Tr0ub4dor&3", &stored).unwrap());
//! assert!(!hasher.verify("wrongpass", &stored).unwrap());
//! ```

pub mod crypto;
mod error;
mod hasher;
mod policy;
mod record;
pub mod security_log;

pub use crate::crypto::{DEFAULT_ITERATIONS, HashParams};
pub use crate::error::{CredentialError, PolicyError, RecordError, Result};
pub use crate::hasher::{CredentialHasher, hash_password, verify_password};
pub use crate::policy::{DEFAULT_MIN_LENGTH, DEFAULT_SYMBOLS, PasswordPolicy, PolicyViolation};
pub use crate::record::CredentialRecord;
pub use crate::security_log::{Level, SecurityLogger};
