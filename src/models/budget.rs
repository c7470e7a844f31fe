//! Budget model and budget evaluation
//!
//! A budget caps spending in one expense category for one calendar month.
//! Its status (spent, percentage, alert flags) is derived from transactions
//! on every read and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::EntryType;
use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;
use super::period::Period;
use super::transaction::Transaction;

/// Alert threshold (percent) used when none is given
pub const DEFAULT_ALERT_THRESHOLD: u8 = 80;

/// A monthly spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Owner of this budget
    pub user_id: UserId,

    /// The expense category this budget caps
    pub category_id: CategoryId,

    /// Spending limit for the period
    pub amount: Money,

    /// Month the budget applies to
    pub period: Period,

    /// Percent of `amount` at which the budget is flagged
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u8,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_alert_threshold() -> u8 {
    DEFAULT_ALERT_THRESHOLD
}

impl Budget {
    /// Create a new budget with the default alert threshold
    pub fn new(user_id: UserId, category_id: CategoryId, amount: Money, period: Period) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id,
            category_id,
            amount,
            period,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a budget with an explicit alert threshold
    pub fn with_threshold(
        user_id: UserId,
        category_id: CategoryId,
        amount: Money,
        period: Period,
        alert_threshold: u8,
    ) -> Self {
        let mut budget = Self::new(user_id, category_id, amount, period);
        budget.alert_threshold = alert_threshold;
        budget
    }

    /// Whether `txn` counts against this budget
    pub fn covers(&self, txn: &Transaction) -> bool {
        txn.kind == EntryType::Expense
            && txn.user_id == self.user_id
            && txn.category_id == Some(self.category_id)
            && self.period.contains(txn.date)
    }

    /// Total of the expenses this budget covers; zero when nothing matches
    pub fn spent<'a, I>(&self, transactions: I) -> Money
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .filter(|t| self.covers(t))
            .map(|t| t.amount)
            .sum()
    }

    /// Evaluate this budget against a set of transactions
    pub fn evaluate<'a, I>(&self, transactions: I) -> BudgetStatus
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        BudgetStatus::evaluate(self.amount, self.alert_threshold, self.spent(transactions))
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount(self.amount));
        }
        if self.alert_threshold > 100 {
            return Err(BudgetValidationError::ThresholdOutOfRange(
                self.alert_threshold,
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} budget: {} (alert at {}%)",
            self.period, self.amount, self.alert_threshold
        )
    }
}

/// Derived state of a budget for its period
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// Sum of covered expenses
    pub spent: Money,

    /// `spent / amount * 100`, or 0 when the amount is not positive
    pub percentage: f64,

    /// Percentage has reached the alert threshold
    pub over_threshold: bool,

    /// Spending is strictly above the budget amount
    pub exceeded: bool,

    /// `amount - spent`, negative once exceeded
    pub remaining: Money,
}

impl BudgetStatus {
    /// Compute the status of a budget of `amount` that has seen `spent`
    pub fn evaluate(amount: Money, alert_threshold: u8, spent: Money) -> Self {
        let percentage = spent.percent_of(amount);

        // Integer comparison so 32000/40000 at 80% is exact
        let over_threshold = if amount.is_positive() {
            i128::from(spent.cents()) * 100
                >= i128::from(alert_threshold) * i128::from(amount.cents())
        } else {
            alert_threshold == 0
        };

        Self {
            spent,
            percentage,
            over_threshold,
            exceeded: spent > amount,
            remaining: amount - spent,
        }
    }

    /// Percentage rounded for display, e.g. "87.6%"
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveAmount(Money),
    ThresholdOutOfRange(u8),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be at least 0.01 (got {})", amount)
            }
            Self::ThresholdOutOfRange(t) => {
                write!(f, "Alert threshold must be between 0 and 100 (got {})", t)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
