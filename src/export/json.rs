//! JSON Export functionality
//!
//! Exports everything a user owns to JSON with schema versioning.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::{MonetaError, MonetaResult};
use crate::models::{Budget, Category, Transaction, User};
use crate::storage::transactions::sort_newest_first;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Export of one user's data
#[derive(Debug, Clone, Serialize)]
pub struct UserExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub user: User,
    pub categories: Vec<Category>,
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub category_count: usize,
    pub transaction_count: usize,
    pub budget_count: usize,

    /// Date of the earliest transaction
    pub earliest_transaction: Option<String>,

    /// Date of the latest transaction
    pub latest_transaction: Option<String>,
}

impl UserExport {
    /// Collect the export of `user` from storage
    pub fn from_storage(storage: &Storage, user: &User) -> MonetaResult<Self> {
        let categories = storage.categories.get_by_user(user.id, None)?;
        let mut transactions = storage.transactions.get_by_user(user.id)?;
        sort_newest_first(&mut transactions);
        let budgets = storage.budgets.get_by_user(user.id, None)?;

        let metadata = ExportMetadata {
            category_count: categories.len(),
            transaction_count: transactions.len(),
            budget_count: budgets.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user: user.clone(),
            categories,
            transactions,
            budgets,
            metadata,
        })
    }
}

/// Export a user's data to JSON
pub fn export_user_json<W: Write>(
    storage: &Storage,
    user: &User,
    writer: W,
    pretty: bool,
) -> MonetaResult<()> {
    let export = UserExport::from_storage(storage, user)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| MonetaError::Export(e.to_string()))?;

    Ok(())
}
