//! Core data models for Moneta
//!
//! This module contains the data structures of the ledger: users,
//! categories, transactions and monthly budgets.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetStatus, DEFAULT_ALERT_THRESHOLD};
pub use category::{Category, EntryType};
pub use ids::{BudgetId, CategoryId, TransactionId, UserId};
pub use money::Money;
pub use period::Period;
pub use transaction::Transaction;
pub use user::{Currency, User};
