//! Product prices.
//!
//! Affiliate products show a reference price in the storefront's currency.
//! Prices are decimal, never floating point, and never negative.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price is not a number")]
    NotANumber,
    #[error("price cannot be negative")]
    Negative,
    #[error("price cannot have more than two decimal places")]
    TooPrecise,
}

/// A non-negative price with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero, used for products listed without a price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validate a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] or [`PriceError::TooPrecise`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        Ok(Self(amount))
    }

    /// Parse a price from user input such as `"19.99"` or `"$19.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] for unparseable input, or the
    /// errors of [`Price::new`].
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim().trim_start_matches('$');
        let amount = Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}
