//! Transaction display formatting
//!
//! Provides utilities for formatting transactions for terminal display:
//! register rows, the full register with totals, and the detail view.

use std::collections::HashMap;

use crate::display::report::{separator, truncate};
use crate::models::{CategoryId, EntryType, Money, Transaction};

/// Category names by id, used to label transactions
pub type CategoryNames = HashMap<CategoryId, String>;

fn category_label(txn: &Transaction, names: &CategoryNames) -> String {
    match txn.category_id {
        Some(id) => names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| "(unknown)".to_string()),
        None => "(uncategorized)".to_string(),
    }
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, names: &CategoryNames) -> String {
    let sign = match txn.kind {
        EntryType::Income => "+",
        EntryType::Expense => "-",
    };

    format!(
        "{:<13} {} {:<20} {:>12} {}",
        txn.id,
        txn.date.format("%Y-%m-%d"),
        truncate(&category_label(txn, names), 20),
        format!("{}{}", sign, txn.amount),
        truncate(&txn.description, 30)
    )
}

/// Format a list of transactions as a register with totals
pub fn format_transaction_register(transactions: &[Transaction], names: &CategoryNames) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<13} {:10} {:<20} {:>12} {}\n",
        "ID", "Date", "Category", "Amount", "Description"
    ));
    output.push_str(&separator(80));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, names));
        output.push('\n');
    }

    let income: Money = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    let expense: Money = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum();

    output.push_str(&separator(80));
    output.push('\n');
    output.push_str(&format!(
        "{} transaction(s)  income {}  expense {}  net {}\n",
        transactions.len(),
        income,
        expense,
        income - expense
    ));

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, category_name: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.kind.label()));
    output.push_str(&format!("Amount:      {}\n", txn.amount));

    if let Some(cat_name) = category_name {
        output.push_str(&format!("Category:    {}\n", cat_name));
    } else {
        output.push_str("Category:    (uncategorized)\n");
    }

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, UserId};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_format_transaction_row() {
        let user = UserId::new();
        let food = Category::new(user, "Food", EntryType::Expense);
        let txn = Transaction::with_details(
            user,
            EntryType::Expense,
            Money::from_cents(1250),
            date(),
            Some(food.id),
            "Market",
        );
        let names: CategoryNames = [(food.id, food.name.clone())].into_iter().collect();

        let row = format_transaction_row(&txn, &names);
        assert!(row.contains("2026-01-15"));
        assert!(row.contains("Food"));
        assert!(row.contains("-12.50"));
        assert!(row.contains("Market"));
    }

    #[test]
    fn test_format_empty_register() {
        let output = format_transaction_register(&[], &CategoryNames::new());
        assert_eq!(output, "No transactions found.\n");
    }

    #[test]
    fn test_register_totals() {
        let user = UserId::new();
        let txns = vec![
            Transaction::new(user, EntryType::Income, Money::from_cents(100000), date()),
            Transaction::new(user, EntryType::Expense, Money::from_cents(2500), date()),
        ];

        let output = format_transaction_register(&txns, &CategoryNames::new());
        assert!(output.contains("(uncategorized)"));
        assert!(output.contains("income 1000.00  expense 25.00  net 975.00"));
    }

    #[test]
    fn test_format_transaction_details() {
        let txn = Transaction::new(
            UserId::new(),
            EntryType::Expense,
            Money::from_cents(5000),
            date(),
        );

        let details = format_transaction_details(&txn, Some("Food"));
        assert!(details.contains("Amount:      50.00"));
        assert!(details.contains("Category:    Food"));
        assert!(details.contains("Type:        Expense"));
    }
}
