//! Transaction CLI commands
//!
//! Implements CLI commands for recording and browsing income and expenses.

use clap::Subcommand;

use crate::cli::{parse_date, parse_kind, parse_money, parse_period, today};
use crate::display::{format_transaction_details, format_transaction_register, CategoryNames};
use crate::error::MonetaResult;
use crate::models::{Category, EntryType, User};
use crate::services::{
    CategoryService, NewTransaction, TransactionFilter, TransactionService, TransactionUpdate,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Amount (e.g. "12.50")
        amount: String,
        /// income or expense; defaults to the category's type, else expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<String>,
        /// Free text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Only income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New category, or "none" to remove it
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Find a category for a transaction, preferring one of the given type
///
/// A category of the other type is still returned so the transaction check
/// can report the mismatch.
fn lookup_category(
    storage: &Storage,
    user: &User,
    identifier: &str,
    kind: Option<EntryType>,
) -> MonetaResult<Category> {
    let service = CategoryService::new(storage);
    if kind.is_some() {
        if let Some(category) = service.find(user.id, identifier, kind)? {
            return Ok(category);
        }
    }
    service.resolve(user.id, identifier, None)
}

fn category_names(storage: &Storage, user: &User) -> MonetaResult<CategoryNames> {
    Ok(storage
        .categories
        .get_by_user(user.id, None)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    user: &User,
    cmd: TransactionCommands,
) -> MonetaResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            kind,
            category,
            date,
            description,
        } => {
            let amount = parse_money(&amount)?;
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let category = category
                .as_deref()
                .map(|c| lookup_category(storage, user, c, kind))
                .transpose()?;
            let kind = kind
                .or(category.as_ref().map(|c| c.kind))
                .unwrap_or(EntryType::Expense);
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);

            let txn = service.create(NewTransaction {
                user_id: user.id,
                kind,
                amount,
                date,
                category_id: category.as_ref().map(|c| c.id),
                description: description.unwrap_or_default(),
            })?;

            println!("Recorded {}: {}", txn.kind.label().to_lowercase(), user.format_money(txn.amount));
            if let Some(category) = &category {
                println!("  Category: {}", category.display_name());
            }
            println!("  Date: {}", txn.date);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            kind,
            category,
            month,
            start,
            end,
            limit,
        } => {
            let mut filter = TransactionFilter::for_user(user.id).limit(limit);
            if let Some(kind) = kind.as_deref() {
                filter = filter.kind(parse_kind(kind)?);
            }
            if let Some(category) = category.as_deref() {
                let category = lookup_category(storage, user, category, filter.kind)?;
                filter = filter.category(category.id);
            }
            if let Some(month) = month.as_deref() {
                filter = filter.period(parse_period(month)?);
            }
            if let Some(start) = start.as_deref() {
                filter = filter.start(parse_date(start)?);
            }
            if let Some(end) = end.as_deref() {
                filter = filter.end(parse_date(end)?);
            }

            let transactions = service.list(&filter)?;
            print!(
                "{}",
                format_transaction_register(&transactions, &category_names(storage, user)?)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service.resolve(user.id, &id)?;
            let category = txn
                .category_id
                .map(|id| storage.categories.get(id))
                .transpose()?
                .flatten();
            print!(
                "{}",
                format_transaction_details(&txn, category.as_ref().map(|c| c.name.as_str()))
            );
        }

        TransactionCommands::Edit {
            id,
            amount,
            kind,
            category,
            date,
            description,
        } => {
            let txn = service.resolve(user.id, &id)?;

            if amount.is_none()
                && kind.is_none()
                && category.is_none()
                && date.is_none()
                && description.is_none()
            {
                println!("No changes specified. Use --amount, --type, --category, --date or --description.");
                return Ok(());
            }

            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let category_id = match category.as_deref() {
                None => None,
                Some(c) if c.trim().eq_ignore_ascii_case("none") => Some(None),
                Some(c) => {
                    let category = lookup_category(storage, user, c, kind.or(Some(txn.kind)))?;
                    Some(Some(category.id))
                }
            };

            let updated = service.update(
                txn.id,
                TransactionUpdate {
                    kind,
                    amount: amount.as_deref().map(parse_money).transpose()?,
                    date: date.as_deref().map(parse_date).transpose()?,
                    category_id,
                    description,
                },
            )?;
            println!("Updated transaction: {}", updated);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.resolve(user.id, &id)?;
            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction: {}", deleted);
        }
    }

    Ok(())
}

