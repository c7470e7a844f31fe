//! Budget CLI commands
//!
//! Implements CLI commands for monthly category budgets and their alerts.

use clap::Subcommand;

use crate::cli::{parse_money, parse_period};
use crate::config::settings::Settings;
use crate::display::{format_alerts, format_budget_details, format_budget_list};
use crate::error::{MonetaError, MonetaResult};
use crate::models::{Budget, Period, User};
use crate::services::budget::BudgetWithStatus;
use crate::services::{BudgetService, BudgetUpdate, CategoryService, NewBudget};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List budgets with their spending
    List {
        /// Only budgets of this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Create a budget for an expense category
    Create {
        /// Expense category name or ID
        category: String,
        /// Budget amount (e.g. "400")
        amount: String,
        /// Month (YYYY-MM), current month if omitted
        #[arg(long)]
        month: Option<String>,
        /// Alert threshold in percent (0-100)
        #[arg(short, long)]
        threshold: Option<u8>,
    },

    /// Show a budget
    Show {
        /// Budget ID, or category name or ID
        budget: String,
        /// Month of the budget when given by category
        #[arg(long)]
        month: Option<String>,
    },

    /// Edit a budget
    Edit {
        /// Budget ID, or category name or ID
        budget: String,
        /// Month of the budget when given by category
        #[arg(long)]
        month: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New alert threshold in percent
        #[arg(short, long)]
        threshold: Option<u8>,
        /// Move the budget to another month (YYYY-MM)
        #[arg(long)]
        period: Option<String>,
        /// Move the budget to another expense category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID, or category name or ID
        budget: String,
        /// Month of the budget when given by category
        #[arg(long)]
        month: Option<String>,
    },

    /// Show budgets that reached their alert threshold
    Alerts {
        /// Month (YYYY-MM), current month if omitted
        #[arg(long)]
        month: Option<String>,
    },
}

fn month_or_current(month: Option<&str>) -> MonetaResult<Period> {
    month.map(parse_period).transpose().map(|p| p.unwrap_or_else(Period::current))
}

fn with_status(
    service: &BudgetService,
    storage: &Storage,
    budget: Budget,
) -> MonetaResult<BudgetWithStatus> {
    let category = storage
        .categories
        .get(budget.category_id)?
        .ok_or_else(|| MonetaError::category_not_found(budget.category_id.to_string()))?;
    let status = service.status(&budget)?;
    Ok(BudgetWithStatus {
        budget,
        category,
        status,
    })
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    user: &User,
    cmd: BudgetCommands,
) -> MonetaResult<()> {
    let service = BudgetService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        BudgetCommands::List { month } => {
            let period = month.as_deref().map(parse_period).transpose()?;
            let budgets = service.list_with_status(user.id, period)?;
            println!("{}", format_budget_list(&budgets));
        }

        BudgetCommands::Create {
            category,
            amount,
            month,
            threshold,
        } => {
            let category = categories.resolve(user.id, &category, None)?;
            let budget = service.create(NewBudget {
                user_id: user.id,
                category_id: category.id,
                amount: parse_money(&amount)?,
                period: month_or_current(month.as_deref())?,
                alert_threshold: Some(threshold.unwrap_or(settings.default_alert_threshold)),
            })?;

            println!(
                "Created budget: {} {} for {}",
                category.display_name(),
                user.format_money(budget.amount),
                budget.period.label()
            );
            println!("  Alert at: {}%", budget.alert_threshold);
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::Show { budget, month } => {
            let period = month.as_deref().map(parse_period).transpose()?;
            let budget = service.resolve(user.id, &budget, period)?;
            print!("{}", format_budget_details(&with_status(&service, storage, budget)?));
        }

        BudgetCommands::Edit {
            budget,
            month,
            amount,
            threshold,
            period,
            category,
        } => {
            let selector = month.as_deref().map(parse_period).transpose()?;
            let budget = service.resolve(user.id, &budget, selector)?;

            if amount.is_none() && threshold.is_none() && period.is_none() && category.is_none() {
                println!("No changes specified. Use --amount, --threshold, --period or --category.");
                return Ok(());
            }

            let category_id = category
                .as_deref()
                .map(|c| categories.resolve(user.id, c, None))
                .transpose()?
                .map(|c| c.id);

            let updated = service.update(
                budget.id,
                BudgetUpdate {
                    category_id,
                    amount: amount.as_deref().map(parse_money).transpose()?,
                    period: period.as_deref().map(parse_period).transpose()?,
                    alert_threshold: threshold,
                },
            )?;
            print!("{}", format_budget_details(&with_status(&service, storage, updated)?));
        }

        BudgetCommands::Delete { budget, month } => {
            let period = month.as_deref().map(parse_period).transpose()?;
            let budget = service.resolve(user.id, &budget, period)?;
            let deleted = service.delete(budget.id)?;
            println!("Deleted budget: {}", deleted);
        }

        BudgetCommands::Alerts { month } => {
            let period = month_or_current(month.as_deref())?;
            let alerts = service.alerts(user.id, period)?;
            println!("Budget alerts for {}", period.label());
            print!("{}", format_alerts(&alerts));
        }
    }

    Ok(())
}
