//! Password strength tips for signup forms
//!
//! Advisory only. The policy reports which tips a candidate password misses;
//! a signup flow typically runs it inside the governor's guarded action.

use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_SPECIAL_CHARS: &str = "!@#$%^&*()";

/// One unmet strength requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasswordTip {
    /// Shorter than the minimum length
    TooShort,
    /// No ASCII uppercase letter
    MissingUppercase,
    /// No ASCII lowercase letter
    MissingLowercase,
    /// No ASCII digit
    MissingDigit,
    /// None of the accepted special characters
    MissingSpecial,
}

impl fmt::Display for PasswordTip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TooShort => "At least 8 characters long",
            Self::MissingUppercase => "At least one uppercase letter",
            Self::MissingLowercase => "At least one lowercase letter",
            Self::MissingDigit => "At least one number",
            Self::MissingSpecial => "At least one special character (!@#$%^&*())",
        };
        f.write_str(text)
    }
}

/// Password strength policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Minimum length in characters
    pub min_length: usize,
    /// Characters that satisfy the special-character tip
    pub special_chars: String,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            special_chars: DEFAULT_SPECIAL_CHARS.to_string(),
        }
    }
}

impl PasswordPolicy {
    /// Tips `password` does not meet, in display order.
    pub fn tips(&self, password: &str) -> Vec<PasswordTip> {
        let mut tips = Vec::new();
        if password.chars().count() < self.min_length {
            tips.push(PasswordTip::TooShort);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            tips.push(PasswordTip::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            tips.push(PasswordTip::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            tips.push(PasswordTip::MissingDigit);
        }
        if !password.chars().any(|c| self.special_chars.contains(c)) {
            tips.push(PasswordTip::MissingSpecial);
        }
        tips
    }

    /// Whether `password` meets every tip.
    pub fn is_satisfied(&self, password: &str) -> bool {
        self.tips(password).is_empty()
    }
}
