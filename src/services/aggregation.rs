//! Aggregation engine
//!
//! Pure functions that roll transactions up into sums, income/expense
//! totals, month series and per-category breakdowns. Nothing here touches
//! storage; callers pass in the transactions and categories to aggregate.
//!
//! Every aggregate treats "no matching transactions" as zero.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, CategoryId, EntryType, Money, Period, Transaction, UserId};

/// Criteria selecting a subset of transactions
///
/// All criteria are optional and combine with AND. Date bounds are
/// inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub user_id: Option<UserId>,
    pub kind: Option<EntryType>,
    pub category_id: Option<CategoryId>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Maximum number of rows returned by `select`; aggregates ignore it
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter scoped to one user's transactions
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: EntryType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start(start).end(end)
    }

    /// Restrict to one calendar month
    pub fn period(self, period: Period) -> Self {
        self.date_range(period.start_date(), period.end_date())
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `txn` satisfies every criterion of this filter
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.user_id.map_or(true, |u| txn.user_id == u)
            && self.kind.map_or(true, |k| txn.kind == k)
            && self.category_id.map_or(true, |c| txn.category_id == Some(c))
            && self.start.map_or(true, |s| txn.date >= s)
            && self.end.map_or(true, |e| txn.date <= e)
    }
}

/// Matching transactions in their original order, truncated to `limit`
pub fn select<'a, I>(transactions: I, filter: &TransactionFilter) -> Vec<Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| filter.matches(t))
        .take(filter.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

/// Sum of the amounts of matching transactions
pub fn sum<'a, I>(transactions: I, filter: &TransactionFilter) -> Money
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| filter.matches(t))
        .map(|t| t.amount)
        .sum()
}

/// Income, expense and their difference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Money,
    pub expense: Money,
    pub net: Money,
}

impl Totals {
    pub fn new(income: Money, expense: Money) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }
}

/// Income and expense totals of the transactions matching `filter`
///
/// A type set on the filter zeroes the other side.
pub fn totals<'a, I>(transactions: I, filter: &TransactionFilter) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = Money::zero();
    let mut expense = Money::zero();

    for txn in transactions.into_iter().filter(|t| filter.matches(t)) {
        match txn.kind {
            EntryType::Income => income += txn.amount,
            EntryType::Expense => expense += txn.amount,
        }
    }

    Totals::new(income, expense)
}

/// Longest month series a dashboard may ask for
pub const MAX_SERIES_MONTHS: usize = 120;

/// `count` consecutive months ending with `end`, oldest first
pub fn trailing_periods(end: Period, count: usize) -> Vec<Period> {
    let mut periods = Vec::with_capacity(count.min(MAX_SERIES_MONTHS));
    let mut current = end;
    for _ in 0..count {
        periods.push(current);
        current = current.prev();
    }
    periods.reverse();
    periods
}

/// One point of a month series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub period: Period,
    /// Chart label, e.g. "Jan 2026"
    pub label: String,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
}

/// Income and expense per month for `user_id`, one entry per requested
/// period in the order given, months without activity included as zero
pub fn monthly_series<'a, I>(
    transactions: I,
    user_id: UserId,
    periods: &[Period],
) -> Vec<MonthlyTotals>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_period: HashMap<Period, (Money, Money)> = periods
        .iter()
        .map(|p| (*p, (Money::zero(), Money::zero())))
        .collect();

    for txn in transactions.into_iter().filter(|t| t.user_id == user_id) {
        if let Some((income, expense)) = by_period.get_mut(&txn.period()) {
            match txn.kind {
                EntryType::Income => *income += txn.amount,
                EntryType::Expense => *expense += txn.amount,
            }
        }
    }

    periods
        .iter()
        .map(|p| {
            let (income, expense) = by_period.get(p).copied().unwrap_or_default();
            MonthlyTotals {
                period: *p,
                label: p.label(),
                income,
                expense,
                net: income - expense,
            }
        })
        .collect()
}

/// One row of a category breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub kind: EntryType,
    pub total: Money,
    pub count: usize,
    /// Percent of the sum of all rows in the breakdown
    pub share: f64,
}

/// Per-category totals of the transactions matching `filter`
///
/// Only categories of the filter's type (if set) and owner (if set) are
/// considered. Categories whose total is zero are left out. Rows are ordered
/// by total, largest first, then by name.
pub fn category_breakdown<'a, I>(
    transactions: I,
    categories: &[Category],
    filter: &TransactionFilter,
) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_category: HashMap<CategoryId, (Money, usize)> = HashMap::new();
    for txn in transactions.into_iter().filter(|t| filter.matches(t)) {
        if let Some(category_id) = txn.category_id {
            let entry = by_category.entry(category_id).or_default();
            entry.0 += txn.amount;
            entry.1 += 1;
        }
    }

    let mut rows: Vec<CategoryTotal> = categories
        .iter()
        .filter(|c| filter.kind.map_or(true, |k| c.kind == k))
        .filter(|c| filter.user_id.map_or(true, |u| c.user_id == u))
        .filter_map(|c| {
            let (total, count) = by_category.get(&c.id).copied()?;
            if total.is_zero() {
                return None;
            }
            Some(CategoryTotal {
                category_id: c.id,
                name: c.name.clone(),
                icon: c.icon.clone(),
                color: c.color.clone(),
                kind: c.kind,
                total,
                count,
                share: 0.0,
            })
        })
        .collect();

    let grand_total: Money = rows.iter().map(|r| r.total).sum();
    for row in &mut rows {
        row.share = row.total.percent_of(grand_total);
    }

    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(s: &str) -> Period {
        Period::parse(s).unwrap()
    }

    struct Fixture {
        user: UserId,
        salary: Category,
        food: Category,
        rent: Category,
        fun: Category,
        transactions: Vec<Transaction>,
    }

    fn txn(
        user: UserId,
        kind: EntryType,
        cents: i64,
        on: NaiveDate,
        category: Option<&Category>,
    ) -> Transaction {
        Transaction::with_details(
            user,
            kind,
            Money::from_cents(cents),
            on,
            category.map(|c| c.id),
            "",
        )
    }

    fn fixture() -> Fixture {
        let user = UserId::new();
        let salary = Category::new(user, "Salary", EntryType::Income);
        let food = Category::new(user, "Food", EntryType::Expense);
        let rent = Category::new(user, "Rent", EntryType::Expense);
        let fun = Category::new(user, "Fun", EntryType::Expense);

        let transactions = vec![
            txn(user, EntryType::Income, 250000, date(2025, 12, 1), Some(&salary)),
            txn(user, EntryType::Income, 250000, date(2026, 1, 1), Some(&salary)),
            txn(user, EntryType::Expense, 35050, date(2026, 1, 15), Some(&food)),
            txn(user, EntryType::Expense, 4950, date(2026, 1, 20), Some(&food)),
            txn(user, EntryType::Expense, 80000, date(2026, 1, 15), Some(&rent)),
            txn(user, EntryType::Expense, 1200, date(2026, 1, 31), None),
            txn(UserId::new(), EntryType::Expense, 99900, date(2026, 1, 10), None),
        ];

        Fixture {
            user,
            salary,
            food,
            rent,
            fun,
            transactions,
        }
    }

    #[test]
    fn test_filter_matches_each_criterion() {
        let f = fixture();
        let food_txn = &f.transactions[2];

        assert!(TransactionFilter::new().matches(food_txn));
        assert!(TransactionFilter::for_user(f.user).matches(food_txn));
        assert!(!TransactionFilter::for_user(UserId::new()).matches(food_txn));
        assert!(!TransactionFilter::new().kind(EntryType::Income).matches(food_txn));
        assert!(TransactionFilter::new().category(f.food.id).matches(food_txn));
        assert!(!TransactionFilter::new().category(f.rent.id).matches(food_txn));
        assert!(TransactionFilter::new()
            .date_range(date(2026, 1, 15), date(2026, 1, 15))
            .matches(food_txn));
        assert!(!TransactionFilter::new().start(date(2026, 1, 16)).matches(food_txn));
        assert!(!TransactionFilter::new().end(date(2026, 1, 14)).matches(food_txn));
        assert!(!TransactionFilter::new().period(period("2025-12")).matches(food_txn));
    }

    #[test]
    fn test_sum_is_zero_without_matches() {
        let f = fixture();
        let filter = TransactionFilter::for_user(f.user).category(f.fun.id);
        assert_eq!(sum(&f.transactions, &filter), Money::zero());

        let none: Vec<Transaction> = Vec::new();
        assert_eq!(sum(&none, &TransactionFilter::new()), Money::zero());
    }

    #[test]
    fn test_sum_by_category_and_period() {
        let f = fixture();
        let filter = TransactionFilter::for_user(f.user)
            .kind(EntryType::Expense)
            .category(f.food.id)
            .period(period("2026-01"));
        assert_eq!(sum(&f.transactions, &filter), Money::from_cents(40000));
    }

    #[test]
    fn test_totals() {
        let f = fixture();
        let jan = totals(
            &f.transactions,
            &TransactionFilter::for_user(f.user).period(period("2026-01")),
        );
        assert_eq!(jan.income, Money::from_cents(250000));
        assert_eq!(jan.expense, Money::from_cents(121200));
        assert_eq!(jan.net, Money::from_cents(128800));

        let all_time = totals(&f.transactions, &TransactionFilter::for_user(f.user));
        assert_eq!(all_time.income, Money::from_cents(500000));
        assert_eq!(all_time.net, Money::from_cents(378800));

        let expenses_only = totals(
            &f.transactions,
            &TransactionFilter::for_user(f.user).kind(EntryType::Expense),
        );
        assert_eq!(expenses_only.income, Money::zero());
    }

    #[test]
    fn test_select_respects_limit_and_order() {
        let f = fixture();
        let rows = select(&f.transactions, &TransactionFilter::for_user(f.user).limit(2));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, f.transactions[0].id);
        assert_eq!(rows[1].id, f.transactions[1].id);
    }

    #[test]
    fn test_trailing_periods() {
        let periods = trailing_periods(period("2026-02"), 4);
        let labels: Vec<_> = periods.iter().map(|p| p.to_string()).collect();
        assert_eq!(labels, ["2025-11", "2025-12", "2026-01", "2026-02"]);
        assert!(trailing_periods(period("2026-02"), 0).is_empty());
    }

    #[test]
    fn test_trailing_periods_long_series() {
        let periods = trailing_periods(period("2026-02"), 300);
        assert_eq!(periods.len(), 300);
        assert_eq!(periods[0].to_string(), "2001-03");
        assert_eq!(periods[299].to_string(), "2026-02");
    }

    #[test]
    fn test_monthly_series_keeps_empty_months() {
        let f = fixture();
        let periods = trailing_periods(period("2026-02"), 4);
        let series = monthly_series(&f.transactions, f.user, &periods);

        assert_eq!(series.len(), 4);
        assert_eq!(series[0].label, "Nov 2025");
        assert_eq!(series[0].income, Money::zero());
        assert_eq!(series[1].income, Money::from_cents(250000));
        assert_eq!(series[2].expense, Money::from_cents(121200));
        assert_eq!(series[3].net, Money::zero());
    }

    #[test]
    fn test_breakdown_suppresses_zero_rows_and_sorts() {
        let f = fixture();
        let categories = vec![
            f.salary.clone(),
            f.food.clone(),
            f.rent.clone(),
            f.fun.clone(),
        ];
        let filter = TransactionFilter::for_user(f.user)
            .kind(EntryType::Expense)
            .period(period("2026-01"));

        let rows = category_breakdown(&f.transactions, &categories, &filter);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Rent", "Food"]);

        assert_eq!(rows[1].total, Money::from_cents(40000));
        assert_eq!(rows[1].count, 2);
        assert!((rows[0].share - 66.666).abs() < 0.01);
        assert!((rows.iter().map(|r| r.share).sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_ties_sorted_by_name() {
        let user = UserId::new();
        let b = Category::new(user, "beta", EntryType::Expense);
        let a = Category::new(user, "Alpha", EntryType::Expense);
        let transactions = vec![
            txn(user, EntryType::Expense, 500, date(2026, 1, 1), Some(&b)),
            txn(user, EntryType::Expense, 500, date(2026, 1, 2), Some(&a)),
        ];

        let rows = category_breakdown(
            &transactions,
            &[b.clone(), a.clone()],
            &TransactionFilter::for_user(user),
        );
        assert_eq!(rows[0].name, "Alpha");
        assert_eq!(rows[1].name, "beta");
    }

    #[test]
    fn test_breakdown_empty_when_nothing_matches() {
        let f = fixture();
        let filter = TransactionFilter::for_user(f.user).period(period("2030-01"));
        assert!(category_breakdown(&f.transactions, &[f.food.clone()], &filter).is_empty());
    }
}
