//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers in the store currency's standard unit
//! (reais, not centavos). They are held as [`Decimal`] so that cart totals never
//! accumulate floating-point error.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative unit price in the store currency.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use techsphere_core::{CurrencyCode, Price};
///
/// let price = Price::new(Decimal::new(12499, 0)).unwrap();
/// assert_eq!(price.line_total(2), Decimal::new(24998, 0));
/// assert_eq!(price.format(CurrencyCode::BRL), "R$ 12.499,00");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }

    /// Format for display in the given currency (e.g. `R$ 4.299,00`).
    #[must_use]
    pub fn format(&self, currency: CurrencyCode) -> String {
        currency.format_amount(self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(CurrencyCode::default()))
    }
}

/// ISO 4217 currency codes supported for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Currency symbol, including any trailing separator used in display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// `(thousands, decimal)` separators for this currency's locale.
    const fn separators(self) -> (char, char) {
        match self {
            Self::BRL | Self::EUR => ('.', ','),
            Self::USD => (',', '.'),
        }
    }

    /// Format an arbitrary amount (which may be negative, e.g. a discount line).
    #[must_use]
    pub fn format_amount(&self, amount: Decimal) -> String {
        let (thousands, decimal) = self.separators();
        let rounded = amount.abs().round_dp(2);
        let plain = format!("{rounded:.2}");
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(thousands);
            }
            grouped.push(*c);
        }

        let sign = if amount < Decimal::ZERO { "-" } else { "" };
        format!("{sign}{}{grouped}{decimal}{frac_part}", self.symbol())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-5, 1)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("2199").unwrap();
        let from_string: Price = serde_json::from_str("\"2199\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.amount(), Decimal::new(2199, 0));
    }

    #[test]
    fn test_deserialize_negative_fails() {
        assert!(serde_json::from_str::<Price>("-10").is_err());
    }

    #[test]
    fn test_line_total() {
        let price = Price::new(Decimal::new(1999, 2)).unwrap();
        assert_eq!(price.line_total(3), Decimal::new(5997, 2));
        assert_eq!(price.line_total(0), Decimal::ZERO);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(Price::from_units(22999).format(CurrencyCode::BRL), "R$ 22.999,00");
        assert_eq!(Price::from_units(300).format(CurrencyCode::BRL), "R$ 300,00");
        assert_eq!(
            Price::from_units(1_234_567).format(CurrencyCode::BRL),
            "R$ 1.234.567,00"
        );
    }

    #[test]
    fn test_format_usd_and_negative() {
        assert_eq!(
            CurrencyCode::USD.format_amount(Decimal::new(123_456, 2)),
            "$1,234.56"
        );
        assert_eq!(
            CurrencyCode::BRL.format_amount(Decimal::new(-300, 0)),
            "-R$ 300,00"
        );
    }

    #[test]
    fn test_display_uses_store_currency() {
        assert_eq!(Price::from_units(4299).to_string(), "R$ 4.299,00");
    }
}
