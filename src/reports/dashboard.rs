//! Dashboard Report
//!
//! The overview of one user: this month's income and expense, the all-time
//! balance, recent activity, budget alerts, a month-by-month series and the
//! spending breakdown of the current month.

use chrono::NaiveDate;
use std::io::Write;

use crate::display::report::{double_separator, format_bar, format_percentage, separator, truncate};
use crate::display::CategoryNames;
use crate::error::{MonetaError, MonetaResult};
use crate::models::{EntryType, Money, Period, Transaction, User};
use crate::services::aggregation::{
    category_breakdown, monthly_series, totals, trailing_periods, CategoryTotal, MonthlyTotals,
    Totals, TransactionFilter, MAX_SERIES_MONTHS,
};
use crate::services::{BudgetService, BudgetWithStatus};
use crate::storage::transactions::sort_newest_first;
use crate::storage::Storage;

/// Number of recent transactions shown by default
pub const DEFAULT_RECENT: usize = 10;

/// Progress towards one of the user's monthly goals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub goal: Money,
    pub actual: Money,
    pub percentage: f64,
}

impl GoalProgress {
    fn new(goal: Money, actual: Money) -> Self {
        Self {
            goal,
            actual,
            percentage: actual.percent_of(goal),
        }
    }
}

/// Dashboard Report
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub user: User,
    /// Month containing `today`
    pub period: Period,
    /// Income, expense and balance of the current month
    pub month: Totals,
    /// Income minus expense over all time
    pub balance: Money,
    /// Most recent transactions, newest first
    pub recent: Vec<Transaction>,
    /// Names of the categories referenced by `recent`
    pub category_names: CategoryNames,
    /// Current-month budgets that reached their alert threshold
    pub alerts: Vec<BudgetWithStatus>,
    /// Income and expense per month, oldest first, ending with `period`
    pub series: Vec<MonthlyTotals>,
    /// Expense categories of the current month, largest first
    pub expense_breakdown: Vec<CategoryTotal>,
    pub income_goal: Option<GoalProgress>,
    pub savings_goal: Option<GoalProgress>,
}

impl DashboardReport {
    /// Generate the dashboard of `user` as of `today` over `months` months
    pub fn generate(
        storage: &Storage,
        user: &User,
        today: NaiveDate,
        months: usize,
    ) -> MonetaResult<Self> {
        Self::generate_with_recent(storage, user, today, months, DEFAULT_RECENT)
    }

    /// Like `generate`, with a custom number of recent transactions
    pub fn generate_with_recent(
        storage: &Storage,
        user: &User,
        today: NaiveDate,
        months: usize,
        recent_count: usize,
    ) -> MonetaResult<Self> {
        if months == 0 {
            return Err(MonetaError::Validation(
                "Dashboard needs at least one month".into(),
            ));
        }
        if months > MAX_SERIES_MONTHS {
            return Err(MonetaError::Validation(format!(
                "Dashboard covers at most {} months, got {}",
                MAX_SERIES_MONTHS, months
            )));
        }

        let period = Period::from_date(today);
        let mut transactions = storage.transactions.get_by_user(user.id)?;
        sort_newest_first(&mut transactions);

        let month = totals(&transactions, &TransactionFilter::for_user(user.id).period(period));
        let balance = totals(&transactions, &TransactionFilter::for_user(user.id)).net;

        let recent: Vec<Transaction> = transactions.iter().take(recent_count).cloned().collect();

        let categories = storage.categories.get_by_user(user.id, None)?;
        let category_names: CategoryNames = categories
            .iter()
            .filter(|c| recent.iter().any(|t| t.category_id == Some(c.id)))
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let alerts = BudgetService::new(storage).alerts(user.id, period)?;

        let series = monthly_series(&transactions, user.id, &trailing_periods(period, months));

        let expense_breakdown = category_breakdown(
            &transactions,
            &categories,
            &TransactionFilter::for_user(user.id)
                .kind(EntryType::Expense)
                .period(period),
        );

        let income_goal = user
            .monthly_income_goal
            .map(|goal| GoalProgress::new(goal, month.income));
        let savings_goal = user
            .monthly_savings_goal
            .map(|goal| GoalProgress::new(goal, month.net));

        Ok(Self {
            user: user.clone(),
            period,
            month,
            balance,
            recent,
            category_names,
            alerts,
            series,
            expense_breakdown,
            income_goal,
            savings_goal,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        let money = |m: Money| self.user.format_money(m);

        output.push_str(&format!(
            "Dashboard: {} - {}\n",
            self.user.username,
            self.period.label()
        ));
        output.push_str(&double_separator(72));
        output.push('\n');
        output.push_str(&format!("Income this month:   {:>16}\n", money(self.month.income)));
        output.push_str(&format!("Expense this month:  {:>16}\n", money(self.month.expense)));
        output.push_str(&format!("Balance this month:  {:>16}\n", money(self.month.net)));
        output.push_str(&format!("Total balance:       {:>16}\n", money(self.balance)));

        if let Some(goal) = &self.income_goal {
            output.push_str(&format!(
                "Income goal:         {} of {} ({})\n",
                money(goal.actual),
                money(goal.goal),
                format_percentage(goal.percentage)
            ));
        }
        if let Some(goal) = &self.savings_goal {
            output.push_str(&format!(
                "Savings goal:        {} of {} ({})\n",
                money(goal.actual),
                money(goal.goal),
                format_percentage(goal.percentage)
            ));
        }

        // Alerts
        output.push_str("\nBudget alerts\n");
        output.push_str(&separator(72));
        output.push('\n');
        if self.alerts.is_empty() {
            output.push_str("  None\n");
        }
        for alert in &self.alerts {
            let marker = if alert.status.exceeded { "EXCEEDED" } else { "ALERT" };
            output.push_str(&format!(
                "  {:<8} {:<24} {:>12} / {:<12} {}\n",
                marker,
                truncate(&alert.category.display_name(), 24),
                alert.status.spent,
                alert.budget.amount,
                alert.status.percentage_label()
            ));
        }

        // Series
        output.push_str(&format!("\nLast {} months\n", self.series.len()));
        output.push_str(&separator(72));
        output.push('\n');
        let max = self
            .series
            .iter()
            .map(|m| m.income.max(m.expense))
            .max()
            .unwrap_or_default()
            .as_f64();
        for point in &self.series {
            output.push_str(&format!(
                "  {:<8} in  {:>12} {}\n",
                point.label,
                point.income,
                format_bar(point.income.as_f64(), max, 30)
            ));
            output.push_str(&format!(
                "  {:<8} out {:>12} {}\n",
                "",
                point.expense,
                format_bar(point.expense.as_f64(), max, 30)
            ));
        }

        // Breakdown
        output.push_str("\nSpending by category\n");
        output.push_str(&separator(72));
        output.push('\n');
        if self.expense_breakdown.is_empty() {
            output.push_str("  No expenses this month\n");
        }
        for row in &self.expense_breakdown {
            output.push_str(&format!(
                "  {:<24} {:>12} {:>7}\n",
                truncate(&format!("{} {}", row.icon, row.name), 24),
                row.total,
                format_percentage(row.share)
            ));
        }

        // Recent
        output.push_str("\nRecent transactions\n");
        output.push_str(&separator(72));
        output.push('\n');
        if self.recent.is_empty() {
            output.push_str("  No transactions yet\n");
        }
        for txn in &self.recent {
            let category = txn
                .category_id
                .and_then(|id| self.category_names.get(&id))
                .map(String::as_str)
                .unwrap_or("(uncategorized)");
            let sign = if txn.is_income() { "+" } else { "-" };
            output.push_str(&format!(
                "  {} {:<20} {:>12} {}\n",
                txn.date.format("%Y-%m-%d"),
                truncate(category, 20),
                format!("{}{}", sign, txn.amount),
                truncate(&txn.description, 24)
            ));
        }

        output
    }

    /// Export the month series and the spending breakdown to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> MonetaResult<()> {
        let mut csv = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);

        csv.write_record(["Month", "Income", "Expense", "Net"])?;
        for point in &self.series {
            csv.write_record([
                point.period.to_string(),
                point.income.to_string(),
                point.expense.to_string(),
                point.net.to_string(),
            ])?;
        }

        csv.write_record([""])?;
        csv.write_record(["Category", "Amount", "Transactions", "Share"])?;
        for row in &self.expense_breakdown {
            csv.write_record([
                row.name.clone(),
                row.total.to_string(),
                row.count.to_string(),
                format!("{:.2}", row.share),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
