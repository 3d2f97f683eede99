//! Card validation against the configured allow-list of test instruments.

use chrono::{DateTime, Datelike, Utc};
use std::collections::HashSet;
use std::fmt;

const MASK_PREFIX: &str = "**** **** **** ";

/// Outcome of checking a card submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCheck {
    Ok,
    InvalidCard,
    Expired,
}

impl CardCheck {
    pub fn code(&self) -> &'static str {
        match self {
            CardCheck::Ok => "OK",
            CardCheck::InvalidCard => "INVALID_CARD",
            CardCheck::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for CardCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Calendar month used for expiry comparisons. Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(instant: DateTime<Utc>) -> Self {
        Self::new(instant.year(), instant.month())
    }

    /// Parses a strict `MM/YY` expiry. Two-digit years map onto 2000..=2099.
    pub fn parse_expiry(raw: &str) -> Option<Self> {
        let (month, year) = raw.split_once('/')?;
        if month.len() != 2 || year.len() != 2 {
            return None;
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let month: u32 = month.parse().ok()?;
        let year: i32 = year.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }

        Some(Self::new(2000 + year, month))
    }
}

/// Checks card submissions against the allow-list and the current month.
#[derive(Debug, Clone, Default)]
pub struct CardValidator {
    allowed: HashSet<String>,
}

impl CardValidator {
    pub fn new(allowed: HashSet<String>) -> Self {
        if allowed.is_empty() {
            tracing::warn!("No test card numbers configured. All card validations will fail.");
        }
        Self { allowed }
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }

    /// Membership is checked first, so an unknown card with a bad expiry is `InvalidCard`.
    pub fn check(&self, card_number: &str, card_expiry: &str, today: YearMonth) -> CardCheck {
        if !self.allowed.contains(card_number) {
            return CardCheck::InvalidCard;
        }

        match YearMonth::parse_expiry(card_expiry) {
            None => CardCheck::InvalidCard,
            Some(expiry) if expiry < today => CardCheck::Expired,
            Some(_) => CardCheck::Ok,
        }
    }
}

/// Redacts a card number down to its last four characters.
///
/// Inputs shorter than four characters are fully masked.
pub fn mask_card_number(card_number: &str) -> String {
    let chars: Vec<char> = card_number.chars().collect();
    if chars.len() < 4 {
        return format!("{MASK_PREFIX}****");
    }
    let last_four: String = chars[chars.len() - 4..].iter().collect();
    format!("{MASK_PREFIX}{last_four}")
}

/// Last four characters of a card number, for log lines.
pub fn card_suffix(card_number: &str) -> String {
    let chars: Vec<char> = card_number.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}
