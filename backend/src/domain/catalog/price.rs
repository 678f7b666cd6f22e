//! Monetary price bounded to the `NUMERIC(6, 2)` storage column.

use bigdecimal::BigDecimal;
use serde::Serialize;

use super::CatalogValidationError;

/// Maximum total significant digits a price may carry.
pub const PRICE_MAX_DIGITS: u32 = 6;
/// Fraction digits stored for a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

const MAX_INTEGER_DIGITS: u32 = PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES;

/// Validated vehicle price, normalized to two fraction digits.
///
/// ## Invariants
/// - At most [`PRICE_DECIMAL_PLACES`] fraction digits in the source value.
/// - At most four digits before the decimal point, so the magnitude never
///   exceeds 9999.99.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Price(BigDecimal);

impl Price {
    /// Validate and construct a [`Price`] from an arbitrary decimal.
    pub fn new(value: BigDecimal) -> Result<Self, CatalogValidationError> {
        let normalized = value.clone().normalized();
        let scale = normalized.fractional_digit_count();
        if scale > i64::from(PRICE_DECIMAL_PLACES) {
            return Err(CatalogValidationError::PriceTooManyDecimals {
                max: PRICE_DECIMAL_PLACES,
            });
        }

        let digits = i64::try_from(normalized.digits()).unwrap_or(i64::MAX);
        let integer_digits = digits - scale;
        if integer_digits > i64::from(MAX_INTEGER_DIGITS) {
            return Err(CatalogValidationError::PriceOutOfRange {
                max_integer_digits: MAX_INTEGER_DIGITS,
            });
        }

        Ok(Self(value.with_scale(i64::from(PRICE_DECIMAL_PLACES))))
    }

    /// Borrow the underlying decimal value.
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Consume the price, yielding the decimal for storage.
    pub fn into_decimal(self) -> BigDecimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
