//! Phone number handling.
//!
//! Phone numbers identify winners and scope one-time passwords, so every phone that
//! enters the engine goes through [`Phone::parse`] first. Two spellings of the same
//! number (`+27 82 123 4321`, `+27-82-123-4321`) normalise to the same value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneError {
    #[error("phone number is required")]
    Empty,
    #[error("phone number contains invalid characters")]
    InvalidCharacter,
    #[error("phone number must have between 7 and 15 digits")]
    InvalidLength,
}

/// A normalised phone number: an optional leading `+` followed by 7 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Normalise and validate a raw phone number.
    ///
    /// Spaces, dashes, dots and parentheses are dropped. A `+` is only accepted
    /// as the first character.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut normalised = String::with_capacity(trimmed.len());
        let mut digits = 0usize;
        for (i, c) in trimmed.chars().enumerate() {
            match c {
                '0'..='9' => {
                    normalised.push(c);
                    digits += 1;
                }
                '+' if i == 0 => normalised.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::InvalidLength);
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for user-facing messages and logs: first 3 and last 4
    /// characters kept, middle replaced (`+27821234321` -> `+27***4321`).
    pub fn masked(&self) -> String {
        mask_phone(&self.0)
    }
}

/// Mask an arbitrary phone string. Inputs too short to keep 7 characters are
/// masked down to their last 2.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 7 {
        let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
        return format!("***{tail}");
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}
