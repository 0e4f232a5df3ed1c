//! Monetary amounts and the validation rules around them.

use crate::core::currency::{format_amount, normalize_code};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoneyError {
    #[error("Invalid amount: {0:?} is not a number")]
    InvalidAmount(String),

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Cannot add {left} and {right} amounts without converting first")]
    CurrencyMismatch { left: String, right: String },

    #[error("Arithmetic overflow converting {amount} from {from} to {to}")]
    Overflow {
        amount: Decimal,
        from: String,
        to: String,
    },
}

/// Parses user supplied text into a non-negative decimal amount.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let trimmed = input.trim();
    let amount =
        Decimal::from_str(trimmed).map_err(|_| MoneyError::InvalidAmount(trimmed.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::NegativeAmount(amount));
    }
    Ok(amount)
}

/// Rounds to whole cents using banker's rounding.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonetaryAmount {
    pub amount: Decimal,
    pub currency: String,
}

impl MonetaryAmount {
    pub fn new(amount: Decimal, currency: &str) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::NegativeAmount(amount));
        }
        Ok(Self {
            amount,
            currency: normalize_code(currency),
        })
    }

    pub fn zero(currency: &str) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency: normalize_code(currency),
        }
    }

    pub fn parse(input: &str, currency: &str) -> Result<Self, MoneyError> {
        Self::new(parse_amount(input)?, currency)
    }

    /// Adds two amounts of the same currency. Different currencies must be
    /// converted by the caller first.
    pub fn checked_add(&self, other: &MonetaryAmount) -> Result<Self, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| MoneyError::Overflow {
                amount: self.amount,
                from: self.currency.clone(),
                to: other.currency.clone(),
            })?;
        Ok(Self {
            amount,
            currency: self.currency.clone(),
        })
    }
}

impl Display for MonetaryAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_amount(self.amount, &self.currency))
    }
}
