//! Period Report
//!
//! Totals and category breakdowns over an arbitrary filter of a user's
//! transactions, usually a date range.

use std::io::Write;

use crate::display::report::{double_separator, format_percentage, separator, truncate};
use crate::display::CategoryNames;
use crate::error::MonetaResult;
use crate::models::{Category, EntryType, Transaction, User};
use crate::services::aggregation::{category_breakdown, totals, CategoryTotal, Totals, TransactionFilter};
use crate::services::TransactionService;
use crate::storage::Storage;

/// Period Report
#[derive(Debug, Clone)]
pub struct PeriodReport {
    pub user: User,
    /// The filter the report was built from, always scoped to `user`
    pub filter: TransactionFilter,
    /// Category the filter is restricted to, if any
    pub category: Option<Category>,
    pub totals: Totals,
    pub income_breakdown: Vec<CategoryTotal>,
    pub expense_breakdown: Vec<CategoryTotal>,
    /// Matching transactions, newest first
    pub transactions: Vec<Transaction>,
    pub category_names: CategoryNames,
}

impl PeriodReport {
    /// Generate the report of `user` for the transactions matching `filter`
    pub fn generate(storage: &Storage, user: &User, filter: &TransactionFilter) -> MonetaResult<Self> {
        let mut filter = filter.clone();
        filter.user_id = Some(user.id);
        filter.limit = None;

        let transactions = TransactionService::new(storage).list(&filter)?;
        let categories = storage.categories.get_by_user(user.id, None)?;

        let totals = totals(&transactions, &filter);
        let breakdown = |kind: EntryType| -> Vec<CategoryTotal> {
            if filter.kind.is_some_and(|k| k != kind) {
                return Vec::new();
            }
            category_breakdown(&transactions, &categories, &filter.clone().kind(kind))
        };
        let income_breakdown = breakdown(EntryType::Income);
        let expense_breakdown = breakdown(EntryType::Expense);

        let category = filter
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id).cloned());
        let category_names = categories.iter().map(|c| (c.id, c.name.clone())).collect();

        Ok(Self {
            user: user.clone(),
            filter,
            category,
            totals,
            income_breakdown,
            expense_breakdown,
            transactions,
            category_names,
        })
    }

    fn range_label(&self) -> String {
        match (self.filter.start, self.filter.end) {
            (Some(start), Some(end)) => format!("{} to {}", start, end),
            (Some(start), None) => format!("since {}", start),
            (None, Some(end)) => format!("until {}", end),
            (None, None) => "all time".to_string(),
        }
    }

    fn format_breakdown(output: &mut String, title: &str, rows: &[CategoryTotal]) {
        output.push_str(&format!("\n{}\n", title));
        output.push_str(&format!(
            "  {:<28} {:>12} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&separator(72));
        output.push('\n');
        if rows.is_empty() {
            output.push_str("  (none)\n");
        }
        for row in rows {
            output.push_str(&format!(
                "  {:<28} {:>12} {:>8} {:>8}\n",
                truncate(&format!("{} {}", row.icon, row.name), 28),
                row.total,
                row.count,
                format_percentage(row.share)
            ));
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        let money = |m| self.user.format_money(m);

        output.push_str(&format!(
            "Report: {} - {}\n",
            self.user.username,
            self.range_label()
        ));
        output.push_str(&double_separator(72));
        output.push('\n');
        if let Some(category) = &self.category {
            output.push_str(&format!("Category:     {}\n", category.display_name()));
        }
        if let Some(kind) = self.filter.kind {
            output.push_str(&format!("Type:         {}\n", kind.label()));
        }
        output.push_str(&format!("Transactions: {}\n", self.transactions.len()));
        output.push_str(&format!("Income:       {:>16}\n", money(self.totals.income)));
        output.push_str(&format!("Expense:      {:>16}\n", money(self.totals.expense)));
        output.push_str(&format!("Net:          {:>16}\n", money(self.totals.net)));

        if self.filter.kind != Some(EntryType::Expense) {
            Self::format_breakdown(&mut output, "INCOME BY CATEGORY", &self.income_breakdown);
        }
        if self.filter.kind != Some(EntryType::Income) {
            Self::format_breakdown(&mut output, "EXPENSE BY CATEGORY", &self.expense_breakdown);
        }

        output.push_str("\nTRANSACTIONS\n");
        output.push_str(&crate::display::format_transaction_register(
            &self.transactions,
            &self.category_names,
        ));

        output
    }

    /// Export the matching transactions to CSV, followed by the totals
    pub fn export_csv<W: Write>(&self, writer: W) -> MonetaResult<()> {
        let mut csv = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);

        csv.write_record(["Date", "Type", "Category", "Amount", "Description"])?;
        for txn in &self.transactions {
            let category = txn
                .category_id
                .and_then(|id| self.category_names.get(&id))
                .cloned()
                .unwrap_or_default();
            csv.write_record([
                txn.date.format("%Y-%m-%d").to_string(),
                txn.kind.label().to_string(),
                category,
                txn.amount.to_string(),
                txn.description.clone(),
            ])?;
        }

        csv.write_record([""])?;
        csv.write_record(["Total income", self.totals.income.to_string().as_str()])?;
        csv.write_record(["Total expense", self.totals.expense.to_string().as_str()])?;
        csv.write_record(["Net", self.totals.net.to_string().as_str()])?;

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MonetaPaths;
    use crate::models::{Money, Period};
    use crate::services::demo;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MonetaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seeded() -> (TempDir, Storage, User) {
        let (temp_dir, storage) = create_test_storage();
        let user = demo::seed(&storage, NaiveDate::from_ymd_opt(2026, 3, 20).unwrap())
            .unwrap()
            .user;
        (temp_dir, storage, user)
    }

    #[test]
    fn test_report_over_date_range() {
        let (_temp_dir, storage, user) = seeded();

        let filter = TransactionFilter::new().date_range(
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        );
        let report = PeriodReport::generate(&storage, &user, &filter).unwrap();

        assert_eq!(report.transactions.len(), 16);
        assert_eq!(report.totals.income, Money::from_cents(500000));
        assert_eq!(report.totals.expense, Money::from_cents(326298));
        assert_eq!(report.income_breakdown.len(), 1);
        assert_eq!(report.income_breakdown[0].share, 100.0);
        assert_eq!(report.expense_breakdown.len(), 7);
        assert!(report.expense_breakdown.iter().all(|r| !r.total.is_zero()));
    }

    #[test]
    fn test_report_by_type_and_category() {
        let (_temp_dir, storage, user) = seeded();
        let food = storage
            .categories
            .get_by_name(user.id, "Food", Some(EntryType::Expense))
            .unwrap()
            .unwrap();

        let filter = TransactionFilter::new()
            .kind(EntryType::Expense)
            .category(food.id)
            .period(Period::parse("2026-01").unwrap());
        let report = PeriodReport::generate(&storage, &user, &filter).unwrap();

        assert_eq!(report.transactions.len(), 1);
        assert!(report.totals.income.is_zero());
        assert_eq!(report.totals.expense, Money::from_cents(35050));
        assert!(report.income_breakdown.is_empty());
        assert_eq!(report.category.as_ref().unwrap().name, "Food");

        let output = report.format_terminal();
        assert!(output.contains("Type:         Expense"));
        assert!(!output.contains("INCOME BY CATEGORY"));
    }

    #[test]
    fn test_export_csv() {
        let (_temp_dir, storage, user) = seeded();
        let filter = TransactionFilter::new().period(Period::parse("2026-03").unwrap());
        let report = PeriodReport::generate(&storage, &user, &filter).unwrap();

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.starts_with("Date,Type,Category,Amount,Description\n"));
        assert!(csv.contains("2026-03-15,Expense,Food,350.50,Groceries\n"));
        assert!(csv.contains("2026-03-01,Income,Salary,2500.00,Salary Mar 2026\n"));
        assert!(csv.contains("Net,868.51\n"));
    }
}
