//! Display formatting for terminal output
//!
//! Formats users, categories, transactions and budgets for the CLI.

pub mod budget;
pub mod category;
pub mod report;
pub mod transaction;
pub mod user;

pub use budget::{format_alerts, format_budget_details, format_budget_list};
pub use category::{format_category_details, format_category_list};
pub use transaction::{
    format_transaction_details, format_transaction_register, format_transaction_row, CategoryNames,
};
pub use user::{format_user_details, format_user_list};
