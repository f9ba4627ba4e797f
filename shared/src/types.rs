//! Common types used across the platform

use rust_decimal::Decimal;
use thiserror::Error;

/// Ordinal of a roll type (type/color row) within its batch
pub type TypeIndex = u32;

/// Error returned when a stored status or category string is not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Divide, falling back to zero when the denominator is zero
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// `part / whole × 100`, zero when `whole` is zero
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    ratio_or_zero(part, whole) * Decimal::ONE_HUNDRED
}

/// `part / whole × 100`, `None` when `whole` is zero (reported as "N/A")
pub fn percent_of_opt(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        None
    } else {
        Some(part / whole * Decimal::ONE_HUNDRED)
    }
}

/// `base × percent / 100`
pub fn apply_percent(base: Decimal, percent: Decimal) -> Decimal {
    base * percent / Decimal::ONE_HUNDRED
}

/// Round a currency amount to paise for display
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}
