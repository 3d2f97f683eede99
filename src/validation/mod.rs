//! Shape checks applied to inbound requests before they reach the payment core.

use bigdecimal::BigDecimal;
use std::fmt;

pub const CARD_NUMBER_MIN_LEN: usize = 13;
pub const CARD_NUMBER_MAX_LEN: usize = 19;
pub const CVV_MIN_LEN: usize = 3;
pub const CVV_MAX_LEN: usize = 4;
pub const AMOUNT_MIN_CENTS: i64 = 1;
pub const AMOUNT_MAX_CENTS: i64 = 99_999_999;
pub const AMOUNT_MAX_SCALE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Request bodies that check their own shape after deserialization.
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

fn validate_digits(
    field: &'static str,
    value: &str,
    min_len: usize,
    max_len: usize,
    message: &str,
) -> ValidationResult {
    validate_required(field, value)?;

    let len = value.len();
    if len < min_len || len > max_len || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(field, message));
    }

    Ok(())
}

pub fn validate_card_number(card_number: &str) -> ValidationResult {
    validate_digits(
        "cardNumber",
        card_number,
        CARD_NUMBER_MIN_LEN,
        CARD_NUMBER_MAX_LEN,
        "Invalid card number",
    )
}

/// Accepts `MM/YY` with a month in 01..=12.
pub fn validate_card_expiry(card_expiry: &str) -> ValidationResult {
    validate_required("cardExpiry", card_expiry)?;

    let invalid = || ValidationError::new("cardExpiry", "Invalid expiry format (MM/YY)");
    let (month, year) = card_expiry.split_once('/').ok_or_else(invalid)?;
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return Err(invalid());
    }

    match month.parse::<u32>() {
        Ok(1..=12) => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_cvv(cvv: &str) -> ValidationResult {
    validate_digits("cvv", cvv, CVV_MIN_LEN, CVV_MAX_LEN, "Invalid CVV")
}

fn from_cents(cents: i64) -> BigDecimal {
    BigDecimal::from(cents) / BigDecimal::from(100)
}

pub fn validate_amount(amount: &BigDecimal) -> ValidationResult {
    let min = from_cents(AMOUNT_MIN_CENTS);
    let max = from_cents(AMOUNT_MAX_CENTS);

    if *amount < min {
        return Err(ValidationError::new("amount", "Amount must be greater than 0"));
    }
    if *amount > max {
        return Err(ValidationError::new("amount", "Amount too large"));
    }
    if amount.with_scale(AMOUNT_MAX_SCALE) != *amount {
        return Err(ValidationError::new(
            "amount",
            "Amount must have at most 2 decimal places",
        ));
    }

    Ok(())
}
