//! Hex color tokens.
//!
//! Every color that reaches a rendered page goes through [`ColorToken::parse`]
//! first. Values end up inside `style` attributes, so anything that is not a
//! plain hex literal is refused.

use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with #")]
    MissingHash,
    #[error("color must have 3, 4, 6 or 8 hex digits")]
    BadLength,
    #[error("color contains a non-hex digit")]
    NotHex,
}

/// A CSS hex color such as `#E04FD4` or `#fff`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorToken(String);

impl ColorToken {
    /// Parse a hex color literal. Case is preserved.
    ///
    /// # Errors
    ///
    /// Returns a [`ColorError`] if the input is not `#` followed by 3, 4, 6
    /// or 8 hex digits.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let digits = input.strip_prefix('#').ok_or(ColorError::MissingHash)?;
        if !matches!(digits.len(), 3 | 4 | 6 | 8) {
            return Err(ColorError::BadLength);
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::NotHex);
        }
        Ok(Self(input.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `input` would parse.
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ColorToken {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorToken> for String {
    fn from(token: ColorToken) -> Self {
        token.0
    }
}
