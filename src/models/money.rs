//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. The currency itself is only a label carried by the user profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use moneta::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    pub const fn from_units_cents(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Approximate value as a float, for charts and percentages
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Share of `whole` this amount represents, in percent
    ///
    /// Returns 0 when `whole` is zero or negative.
    pub fn percent_of(&self, whole: Money) -> f64 {
        if whole.0 <= 0 {
            0.0
        } else {
            self.0 as f64 * 100.0 / whole.0 as f64
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "-10.50", "10", "10.5" and "10,50", optionally with a
    /// leading currency symbol. More than two fractional digits is an error.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s.trim();

        let (negative, s) = match original.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, original),
        };

        let s = s.trim_start_matches(&['$', '€', '£'][..]).trim();
        let s = s.replace(',', ".");

        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        let (units_str, cents_str) = match s.split_once('.') {
            Some((u, c)) => (u, c),
            None => (s.as_str(), ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(units_str) || !all_digits(cents_str) || (units_str.is_empty() && cents_str.is_empty()) {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        if cents_str.len() > 2 {
            return Err(MoneyParseError::TooManyDecimals(original.to_string()));
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str
                .parse()
                .map_err(|_| MoneyParseError::InvalidFormat(original.to_string()))?
        };

        let cents: i64 = match cents_str.len() {
            0 => 0,
            1 => cents_str.parse::<i64>().unwrap_or(0) * 10,
            _ => cents_str.parse::<i64>().unwrap_or(0),
        };

        let total = units
            .checked_mul(100)
            .and_then(|u| u.checked_add(cents))
            .ok_or_else(|| MoneyParseError::InvalidFormat(original.to_string()))?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a currency label, e.g. "12.50 EUR"
    pub fn format_with_currency(&self, currency: &str) -> String {
        if currency.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, currency)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_negative() {
            format!("-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            format!("{}.{:02}", self.units(), self.cents_part())
        };
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooManyDecimals(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooManyDecimals(s) => {
                write!(f, "Amount has more than two decimal places: {}", s)
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}
