//! Password strength policy.
//!
//! A password is strong when it is long enough, mixes lowercase, uppercase,
//! digits and at least one allowed symbol, and contains nothing else.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::PolicyError;

/// Default minimum password length, in characters.
pub const DEFAULT_MIN_LENGTH: usize = 8;
/// Default set of allowed special symbols.
pub const DEFAULT_SYMBOLS: &str = "@$!%*#?&";

/// One unmet policy rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum PolicyViolation {
    TooShort { min_length: usize, actual: usize },
    MissingLowercase,
    MissingUppercase,
    MissingDigit,
    MissingSymbol,
    DisallowedCharacter { found: char },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::TooShort { min_length, actual } => write!(
                f,
                "too short: minimum {min_length} characters, got {actual}"
            ),
            PolicyViolation::MissingLowercase => write!(f, "no lowercase letter"),
            PolicyViolation::MissingUppercase => write!(f, "no uppercase letter"),
            PolicyViolation::MissingDigit => write!(f, "no digit"),
            PolicyViolation::MissingSymbol => write!(f, "no special symbol"),
            PolicyViolation::DisallowedCharacter { found } => {
                write!(f, "character '{found}' is not allowed")
            }
        }
    }
}

/// Configurable password strength rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_length: usize,
    symbols: BTreeSet<char>,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            symbols: DEFAULT_SYMBOLS.chars().collect(),
        }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize, symbols: &str) -> Result<Self, PolicyError> {
        Self::default()
            .with_min_length(min_length)?
            .with_symbols(symbols)
    }

    /// Replaces the allowed symbol set.
    ///
    /// Symbols must be ASCII punctuation or other non-alphanumeric,
    /// non-whitespace characters.
    pub fn with_symbols(mut self, symbols: &str) -> Result<Self, PolicyError> {
        let set: BTreeSet<char> = symbols.chars().collect();
        if set.is_empty() {
            return Err(PolicyError::EmptySymbols);
        }
        if let Some(&c) = set
            .iter()
            .find(|c| c.is_alphanumeric() || c.is_whitespace() || c.is_control())
        {
            return Err(PolicyError::InvalidSymbol(c));
        }
        self.symbols = set;
        Ok(self)
    }

    pub fn with_min_length(mut self, min_length: usize) -> Result<Self, PolicyError> {
        if min_length == 0 {
            return Err(PolicyError::ZeroLength);
        }
        self.min_length = min_length;
        Ok(self)
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn symbols(&self) -> String {
        self.symbols.iter().collect()
    }

    /// Returns `true` if `password` meets every rule.
    pub fn is_strong(&self, password: &str) -> bool {
        self.violations(password).is_empty()
    }

    /// Lists every rule `password` breaks, in a fixed order.
    pub fn violations(&self, password: &str) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();

        let length = password.chars().count();
        if length < self.min_length {
            violations.push(PolicyViolation::TooShort {
                min_length: self.min_length,
                actual: length,
            });
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            violations.push(PolicyViolation::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push(PolicyViolation::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingDigit);
        }
        if !password.chars().any(|c| self.symbols.contains(&c)) {
            violations.push(PolicyViolation::MissingSymbol);
        }
        if let Some(found) = password
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !self.symbols.contains(c))
        {
            violations.push(PolicyViolation::DisallowedCharacter { found });
        }

        violations
    }

    /// Human-readable requirement string suitable for UI messages.
    pub fn requirement_message(&self) -> String {
        let base = format!(
            "Password must be at least {} characters long and include \
             uppercase, lowercase, a digit, and a special symbol",
            self.min_length
        );
        if *self == Self::default() {
            format!("{base}.")
        } else {
            format!("{base} ({}).", self.symbols())
        }
    }
}
