//! Cryptographic primitives for credential records.
//!
//! Provides salt generation, PBKDF2 key derivation and constant-time
//! comparison.

pub mod compare;
pub mod kdf;
pub mod random;

pub use compare::constant_time_eq;
pub use kdf::{DEFAULT_ITERATIONS, HashParams, derive_key};
pub use random::generate_salt;

/// Length of a freshly generated salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of a freshly derived key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Shortest salt accepted for new records.
pub const MIN_SALT_LEN: usize = 8;
/// Shortest derived key accepted for new records.
pub const MIN_KEY_LEN: usize = 16;
