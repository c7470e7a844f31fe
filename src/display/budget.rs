//! Budget display formatting
//!
//! Budget tables with their spending state, and the alert listing.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::display::report::format_gauge;
use crate::services::BudgetWithStatus;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Month")]
    period: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budget")]
    amount: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Alert at")]
    threshold: String,
    #[tabled(rename = "State")]
    state: String,
}

/// Short state label for a budget
pub fn state_label(entry: &BudgetWithStatus) -> &'static str {
    if entry.status.exceeded {
        "EXCEEDED"
    } else if entry.status.over_threshold {
        "ALERT"
    } else {
        "OK"
    }
}

/// Format budgets with their status as a table
pub fn format_budget_list(budgets: &[BudgetWithStatus]) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        id: b.budget.id.to_string(),
        period: b.budget.period.to_string(),
        category: b.category.display_name(),
        amount: b.budget.amount.to_string(),
        spent: b.status.spent.to_string(),
        remaining: b.status.remaining.to_string(),
        used: format!(
            "{} {}",
            format_gauge(b.status.percentage, 10),
            b.status.percentage_label()
        ),
        threshold: format!("{}%", b.budget.alert_threshold),
        state: state_label(b).to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format a single budget's details
pub fn format_budget_details(entry: &BudgetWithStatus) -> String {
    let budget = &entry.budget;
    let status = &entry.status;

    let mut output = String::new();
    output.push_str(&format!(
        "Budget: {} {}\n",
        entry.category.display_name(),
        budget.period.label()
    ));
    output.push_str(&format!("  ID:         {}\n", budget.id));
    output.push_str(&format!("  Amount:     {}\n", budget.amount));
    output.push_str(&format!("  Spent:      {}\n", status.spent));
    output.push_str(&format!("  Remaining:  {}\n", status.remaining));
    output.push_str(&format!(
        "  Used:       {} {}\n",
        format_gauge(status.percentage, 20),
        status.percentage_label()
    ));
    output.push_str(&format!("  Alert at:   {}%\n", budget.alert_threshold));
    output.push_str(&format!("  State:      {}\n", state_label(entry)));

    output
}

/// Format budgets that reached their alert threshold
pub fn format_alerts(alerts: &[BudgetWithStatus]) -> String {
    if alerts.is_empty() {
        return "No budget alerts.\n".to_string();
    }

    let mut output = String::new();
    for entry in alerts {
        let detail = if entry.status.exceeded {
            format!("exceeded by {}", -entry.status.remaining)
        } else {
            format!("{} left", entry.status.remaining)
        };
        output.push_str(&format!(
            "⚠ {}: {} of {} spent ({}, alert at {}%), {}\n",
            entry.category.display_name(),
            entry.status.spent,
            entry.budget.amount,
            entry.status.percentage_label(),
            entry.budget.alert_threshold,
            detail
        ));
    }

    output
}
