//! User profile model
//!
//! A user owns categories, transactions and budgets. The currency is a
//! display label only; no conversion ever happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::UserId;
use super::money::Money;

const MAX_USERNAME_LEN: usize = 150;

/// Currency label shown next to amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Xof,
}

impl Currency {
    pub fn all() -> &'static [Self] {
        &[Self::Eur, Self::Usd, Self::Gbp, Self::Xof]
    }

    /// ISO code, e.g. "EUR"
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Xof => "XOF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unsupported currency '{}' (expected one of EUR, USD, GBP, XOF)",
                    s.trim()
                )
            })
    }
}

/// A user and their profile preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Login name, unique ignoring case
    pub username: String,

    /// Currency label for this user's amounts
    #[serde(default)]
    pub currency: Currency,

    /// Target monthly income
    #[serde(default)]
    pub monthly_income_goal: Option<Money>,

    /// Target monthly savings
    #[serde(default)]
    pub monthly_savings_goal: Option<Money>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with default preferences
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: username.into().trim().to_string(),
            currency: Currency::default(),
            monthly_income_goal: None,
            monthly_savings_goal: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive username comparison
    pub fn name_matches(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username.trim())
    }

    /// Format an amount in this user's currency
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_currency(self.currency.code())
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        let name = self.username.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if name.chars().count() > MAX_USERNAME_LEN {
            return Err(UserValidationError::UsernameTooLong);
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
        {
            return Err(UserValidationError::InvalidCharacter(c));
        }

        for goal in [self.monthly_income_goal, self.monthly_savings_goal]
            .into_iter()
            .flatten()
        {
            if goal.is_negative() {
                return Err(UserValidationError::NegativeGoal);
            }
        }

        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong,
    InvalidCharacter(char),
    NegativeGoal,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "Username cannot be empty"),
            Self::UsernameTooLong => {
                write!(f, "Username too long (max {} chars)", MAX_USERNAME_LEN)
            }
            Self::InvalidCharacter(c) => write!(
                f,
                "Username may only contain letters, digits and @/./+/-/_ (found '{}')",
                c
            ),
            Self::NegativeGoal => write!(f, "Monthly goals cannot be negative"),
        }
    }
}

impl std::error::Error for UserValidationError {}
