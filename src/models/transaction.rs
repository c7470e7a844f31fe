//! Transaction model
//!
//! A transaction is a single income or expense entry. Amounts are always
//! positive; the direction comes from the entry type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, EntryType};
use super::ids::{CategoryId, TransactionId, UserId};
use super::money::Money;
use super::period::Period;

/// Smallest amount a transaction may carry (0.01)
pub const MIN_AMOUNT: Money = Money::from_cents(1);

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owner of this transaction
    pub user_id: UserId,

    /// Category, if any. Cleared when the category is deleted
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Amount, always positive
    pub amount: Money,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: EntryType,

    /// Transaction date
    pub date: NaiveDate,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new uncategorized transaction
    pub fn new(user_id: UserId, kind: EntryType, amount: Money, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            user_id,
            category_id: None,
            amount,
            kind,
            date,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a transaction with all common fields
    pub fn with_details(
        user_id: UserId,
        kind: EntryType,
        amount: Money,
        date: NaiveDate,
        category_id: Option<CategoryId>,
        description: impl Into<String>,
    ) -> Self {
        let mut txn = Self::new(user_id, kind, amount, date);
        txn.category_id = category_id;
        txn.description = description.into();
        txn
    }

    pub fn is_income(&self) -> bool {
        self.kind.is_income()
    }

    pub fn is_expense(&self) -> bool {
        self.kind.is_expense()
    }

    /// The calendar month this transaction falls in
    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }

    /// Amount with sign applied: positive for income, negative for expense
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EntryType::Income => self.amount,
            EntryType::Expense => -self.amount,
        }
    }

    /// Validate the fields of the transaction itself
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount < MIN_AMOUNT {
            return Err(TransactionValidationError::AmountTooSmall(self.amount));
        }
        Ok(())
    }

    /// Check that `category` can hold this transaction
    pub fn check_category(&self, category: &Category) -> Result<(), TransactionValidationError> {
        if category.user_id != self.user_id {
            return Err(TransactionValidationError::ForeignCategory(
                category.name.clone(),
            ));
        }
        if category.kind != self.kind {
            return Err(TransactionValidationError::TypeMismatch {
                category: category.name.clone(),
                category_type: category.kind,
                transaction_type: self.kind,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind.label(),
            self.amount
        )?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    AmountTooSmall(Money),
    ForeignCategory(String),
    TypeMismatch {
        category: String,
        category_type: EntryType,
        transaction_type: EntryType,
    },
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmountTooSmall(amount) => write!(
                f,
                "Transaction amount must be at least {} (got {})",
                MIN_AMOUNT, amount
            ),
            Self::ForeignCategory(name) => {
                write!(f, "Category '{}' belongs to another user", name)
            }
            Self::TypeMismatch {
                category,
                category_type,
                transaction_type,
            } => write!(
                f,
                "Transaction type {} does not match category '{}' ({})",
                transaction_type, category, category_type
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
