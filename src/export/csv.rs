//! CSV Export functionality
//!
//! Exports a user's transactions to a spreadsheet-friendly CSV file.

use std::collections::HashMap;
use std::io::Write;

use crate::error::MonetaResult;
use crate::models::UserId;
use crate::storage::transactions::sort_newest_first;
use crate::storage::Storage;

/// Byte order mark so spreadsheet applications detect UTF-8
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const TRANSACTION_HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

/// Export all transactions of a user to CSV, newest first
///
/// Returns the number of rows written.
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    user_id: UserId,
    mut writer: W,
) -> MonetaResult<usize> {
    let category_names: HashMap<_, _> = storage
        .categories
        .get_by_user(user_id, None)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut transactions = storage.transactions.get_by_user(user_id)?;
    sort_newest_first(&mut transactions);

    writer.write_all(UTF8_BOM)?;
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(TRANSACTION_HEADER)?;

    for txn in &transactions {
        let category = txn
            .category_id
            .and_then(|id| category_names.get(&id))
            .map(String::as_str)
            .unwrap_or("");
        csv.write_record([
            txn.date.format("%Y-%m-%d").to_string().as_str(),
            txn.kind.label(),
            category,
            txn.amount.to_string().as_str(),
            txn.description.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(transactions.len())
}
