//! Category model
//!
//! Categories are user-defined labels for transactions. Every category is
//! either an income or an expense category, and transactions may only be
//! filed under a category of their own type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, UserId};

/// Default icon for new categories
pub const DEFAULT_ICON: &str = "💰";

/// Default color for new categories
pub const DEFAULT_COLOR: &str = "#3498db";

/// Maximum category name length (characters)
pub const MAX_NAME_LEN: usize = 100;

const MAX_ICON_LEN: usize = 50;

/// Whether money comes in or goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn all() -> &'static [Self] {
        &[Self::Income, Self::Expense]
    }

    /// Human-readable label ("Income" / "Expense")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.pad("INCOME"),
            Self::Expense => f.pad("EXPENSE"),
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!(
                "Invalid entry type '{}' (expected income or expense)",
                other
            )),
        }
    }
}

/// A user-defined transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Owner of this category
    pub user_id: UserId,

    /// Category name, unique per user and type
    pub name: String,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: EntryType,

    /// Display icon (usually an emoji)
    #[serde(default = "default_icon")]
    pub icon: String,

    /// Display color as `#RRGGBB`
    #[serde(default = "default_color")]
    pub color: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Category {
    /// Create a new category with the default icon and color
    pub fn new(user_id: UserId, name: impl Into<String>, kind: EntryType) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            user_id,
            name: name.into(),
            kind,
            icon: default_icon(),
            color: default_color(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive name comparison, used for uniqueness and lookup
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Display name with icon, e.g. "🛒 Groceries"
    pub fn display_name(&self) -> String {
        if self.icon.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.icon, self.name)
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if self.icon.chars().count() > MAX_ICON_LEN {
            return Err(CategoryValidationError::IconTooLong);
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    IconTooLong,
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_NAME_LEN
            ),
            Self::IconTooLong => {
                write!(f, "Category icon too long (max {} chars)", MAX_ICON_LEN)
            }
            Self::InvalidColor(c) => {
                write!(f, "Invalid color '{}' (expected #RRGGBB)", c)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
