//! Service layer for Moneta
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, budget evaluation and aggregation over transactions.

pub mod aggregation;
pub mod budget;
pub mod category;
pub mod demo;
pub mod transaction;
pub mod user;

pub use aggregation::{CategoryTotal, MonthlyTotals, Totals, TransactionFilter};
pub use budget::{BudgetService, BudgetUpdate, BudgetWithStatus, NewBudget};
pub use category::{CategoryDeletion, CategoryService, CategoryUpdate};
pub use transaction::{NewTransaction, TransactionService, TransactionUpdate};
pub use user::{ProfileUpdate, UserDeletion, UserService};

use crate::error::{MonetaError, MonetaResult};

/// The single candidate whose ID satisfies `is_match`
///
/// A short ID shared by several candidates is an error rather than a guess.
pub(crate) fn unique_id_match<T>(
    entity_type: &str,
    identifier: &str,
    candidates: impl IntoIterator<Item = T>,
    is_match: impl Fn(&T) -> bool,
) -> MonetaResult<Option<T>> {
    let mut matching = candidates.into_iter().filter(|c| is_match(c));
    let first = matching.next();
    if first.is_some() && matching.next().is_some() {
        return Err(MonetaError::Validation(format!(
            "{} ID '{}' is ambiguous. Use more characters or the full ID",
            entity_type,
            identifier.trim()
        )));
    }
    Ok(first)
}
