//! Demo data
//!
//! Seeds a "demo" user with categories, three months of activity and a few
//! budgets for the current month, so the dashboard and reports have
//! something to show. Seeding twice is a no-op.

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::error::{MonetaError, MonetaResult};
use crate::models::{Category, EntryType, Money, Period, User};
use crate::services::aggregation::trailing_periods;
use crate::services::budget::{BudgetService, NewBudget};
use crate::services::category::CategoryService;
use crate::services::transaction::{NewTransaction, TransactionService};
use crate::services::user::UserService;
use crate::storage::Storage;

pub const DEMO_USERNAME: &str = "demo";

const INCOME_CATEGORIES: [(&str, &str, &str); 4] = [
    ("Salary", "💼", "#27ae60"),
    ("Freelance", "💻", "#16a085"),
    ("Investments", "📈", "#2980b9"),
    ("Other income", "💵", "#8e44ad"),
];

const EXPENSE_CATEGORIES: [(&str, &str, &str); 8] = [
    ("Food", "🍔", "#e74c3c"),
    ("Transport", "🚗", "#e67e22"),
    ("Housing", "🏠", "#34495e"),
    ("Leisure", "🎬", "#9b59b6"),
    ("Health", "💊", "#1abc9c"),
    ("Shopping", "🛍️", "#f39c12"),
    ("Education", "📚", "#3498db"),
    ("Subscriptions", "📺", "#7f8c8d"),
];

/// Monthly expenses as (category, cents, description)
const MONTHLY_EXPENSES: [(&str, i64, &str); 7] = [
    ("Food", 35050, "Groceries"),
    ("Transport", 8000, "Transit pass"),
    ("Housing", 80000, "Rent"),
    ("Leisure", 12000, "Cinema and dinner"),
    ("Health", 4500, "Pharmacy"),
    ("Shopping", 20000, "Clothes"),
    ("Subscriptions", 3599, "Streaming services"),
];

const MONTHLY_SALARY: i64 = 250000;

/// Current-month budgets as (category, cents, alert threshold)
const BUDGETS: [(&str, i64, u8); 4] = [
    ("Food", 40000, 80),
    ("Transport", 10000, 75),
    ("Leisure", 15000, 85),
    ("Shopping", 25000, 80),
];

/// Number of months of seeded activity, ending with the current one
pub const DEMO_MONTHS: usize = 3;

/// What seeding produced
#[derive(Debug, Clone)]
pub struct DemoSummary {
    pub user: User,
    /// False when the demo user already existed and nothing was added
    pub created: bool,
    pub categories: usize,
    pub transactions: usize,
    pub budgets: usize,
}

/// Seed the demo user relative to `today`
pub fn seed(storage: &Storage, today: NaiveDate) -> MonetaResult<DemoSummary> {
    let users = UserService::new(storage);
    if let Some(user) = users.find(DEMO_USERNAME)? {
        info!("demo data already present");
        return Ok(DemoSummary {
            user,
            created: false,
            categories: 0,
            transactions: 0,
            budgets: 0,
        });
    }

    let user = users.create(DEMO_USERNAME, None)?;

    let categories = CategoryService::new(storage);
    let mut created: Vec<Category> = Vec::new();
    for (kind, specs) in [
        (EntryType::Income, &INCOME_CATEGORIES[..]),
        (EntryType::Expense, &EXPENSE_CATEGORIES[..]),
    ] {
        for &(name, icon, color) in specs {
            created.push(categories.create(user.id, name, kind, Some(icon), Some(color))?);
        }
    }
    let lookup = |name: &str, kind: EntryType| {
        created
            .iter()
            .find(|c| c.kind == kind && c.name == name)
            .map(|c| c.id)
            .ok_or_else(|| MonetaError::category_not_found(name))
    };

    let transactions = TransactionService::new(storage);
    let current = Period::from_date(today);
    let mut transaction_count = 0;
    for period in trailing_periods(current, DEMO_MONTHS) {
        let payday = period.start_date();
        transactions.create(NewTransaction {
            user_id: user.id,
            kind: EntryType::Income,
            amount: Money::from_cents(MONTHLY_SALARY),
            date: payday,
            category_id: Some(lookup("Salary", EntryType::Income)?),
            description: format!("Salary {}", period.label()),
        })?;
        transaction_count += 1;

        let mid_month = payday.with_day(15).unwrap_or(payday);
        for (name, cents, description) in MONTHLY_EXPENSES {
            transactions.create(NewTransaction {
                user_id: user.id,
                kind: EntryType::Expense,
                amount: Money::from_cents(cents),
                date: mid_month,
                category_id: Some(lookup(name, EntryType::Expense)?),
                description: description.to_string(),
            })?;
            transaction_count += 1;
        }
    }

    let budgets = BudgetService::new(storage);
    for (name, cents, threshold) in BUDGETS {
        budgets.create(NewBudget {
            user_id: user.id,
            category_id: lookup(name, EntryType::Expense)?,
            amount: Money::from_cents(cents),
            period: current,
            alert_threshold: Some(threshold),
        })?;
    }

    info!(
        categories = created.len(),
        transactions = transaction_count,
        budgets = BUDGETS.len(),
        "demo data seeded"
    );

    Ok(DemoSummary {
        user,
        created: true,
        categories: created.len(),
        transactions: transaction_count,
        budgets: BUDGETS.len(),
    })
}
