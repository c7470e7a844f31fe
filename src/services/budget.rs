//! Budget service
//!
//! Provides business logic for monthly category budgets: creation and
//! editing under the uniqueness rules, and evaluation of each budget
//! against the transactions of its month.

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{MonetaError, MonetaResult};
use crate::models::{
    Budget, BudgetId, BudgetStatus, Category, CategoryId, EntryType, Money, Period, UserId,
    DEFAULT_ALERT_THRESHOLD,
};
use crate::services::unique_id_match;
use crate::storage::Storage;

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub amount: Money,
    pub period: Period,
    /// Falls back to the default threshold when unset
    pub alert_threshold: Option<u8>,
}

/// Changes to an existing budget; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub category_id: Option<CategoryId>,
    pub amount: Option<Money>,
    pub period: Option<Period>,
    pub alert_threshold: Option<u8>,
}

/// A budget with its category and evaluated status
#[derive(Debug, Clone)]
pub struct BudgetWithStatus {
    pub budget: Budget,
    pub category: Category,
    pub status: BudgetStatus,
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The category a budget may cap: an expense category of the same user
    fn budget_category(&self, user_id: UserId, category_id: CategoryId) -> MonetaResult<Category> {
        let category = self
            .storage
            .categories
            .get(category_id)?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| MonetaError::category_not_found(category_id.to_string()))?;

        if category.kind != EntryType::Expense {
            return Err(MonetaError::Budget(format!(
                "Budgets can only be set on expense categories; '{}' is {}",
                category.name, category.kind
            )));
        }

        Ok(category)
    }

    fn ensure_unique(&self, budget: &Budget, category: &Category) -> MonetaResult<()> {
        match self
            .storage
            .budgets
            .find(budget.user_id, budget.category_id, budget.period)?
        {
            Some(existing) if existing.id != budget.id => Err(MonetaError::Duplicate {
                entity_type: "Budget",
                identifier: format!("{} {}", category.name, budget.period),
            }),
            _ => Ok(()),
        }
    }

    /// Create a budget, unique per (user, category, period)
    pub fn create(&self, input: NewBudget) -> MonetaResult<Budget> {
        let category = self.budget_category(input.user_id, input.category_id)?;

        let budget = Budget::with_threshold(
            input.user_id,
            input.category_id,
            input.amount,
            input.period,
            input.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD),
        );
        budget
            .validate()
            .map_err(|e| MonetaError::Validation(e.to_string()))?;
        self.ensure_unique(&budget, &category)?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", category.name, budget.period)),
            &budget,
        )?;
        info!(category = %category.name, period = %budget.period, amount = %budget.amount, "budget created");

        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> MonetaResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find one of a user's budgets by (short) id
    pub fn find(&self, user_id: UserId, identifier: &str) -> MonetaResult<Option<Budget>> {
        unique_id_match(
            "Budget",
            identifier,
            self.storage.budgets.get_by_user(user_id, None)?,
            |b| b.id.matches(identifier),
        )
    }

    /// Find a user's budget by id, or by category name/id plus period
    pub fn resolve(
        &self,
        user_id: UserId,
        identifier: &str,
        period: Option<Period>,
    ) -> MonetaResult<Budget> {
        if let Some(budget) = self.find(user_id, identifier)? {
            return Ok(budget);
        }

        let category = crate::services::CategoryService::new(self.storage).find(
            user_id,
            identifier,
            Some(EntryType::Expense),
        )?;
        if let Some(category) = category {
            let period = period.unwrap_or_else(Period::current);
            if let Some(budget) = self.storage.budgets.find(user_id, category.id, period)? {
                return Ok(budget);
            }
        }

        Err(MonetaError::budget_not_found(identifier))
    }

    /// A user's budgets, newest period first, optionally for one month
    pub fn list(&self, user_id: UserId, period: Option<Period>) -> MonetaResult<Vec<Budget>> {
        self.storage.budgets.get_by_user(user_id, period)
    }

    pub fn update(&self, id: BudgetId, update: BudgetUpdate) -> MonetaResult<Budget> {
        let mut budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| MonetaError::budget_not_found(id.to_string()))?;
        let before = budget.clone();

        if let Some(category_id) = update.category_id {
            budget.category_id = category_id;
        }
        if let Some(amount) = update.amount {
            budget.amount = amount;
        }
        if let Some(period) = update.period {
            budget.period = period;
        }
        if let Some(threshold) = update.alert_threshold {
            budget.alert_threshold = threshold;
        }
        budget.updated_at = chrono::Utc::now();

        let category = self.budget_category(budget.user_id, budget.category_id)?;
        budget
            .validate()
            .map_err(|e| MonetaError::Validation(e.to_string()))?;
        self.ensure_unique(&budget, &category)?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", category.name, budget.period)),
            &before,
            &budget,
        )?;

        Ok(budget)
    }

    pub fn delete(&self, id: BudgetId) -> MonetaResult<Budget> {
        let budget = self
            .storage
            .budgets
            .delete(id)?
            .ok_or_else(|| MonetaError::budget_not_found(id.to_string()))?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.period.to_string()),
            &budget,
        )?;
        info!(id = %budget.id, "budget deleted");

        Ok(budget)
    }

    /// Evaluate a budget against its month's expenses
    pub fn status(&self, budget: &Budget) -> MonetaResult<BudgetStatus> {
        let transactions = self.storage.transactions.get_by_category(budget.category_id)?;
        Ok(budget.evaluate(&transactions))
    }

    /// A user's budgets with their status, optionally for one month
    pub fn list_with_status(
        &self,
        user_id: UserId,
        period: Option<Period>,
    ) -> MonetaResult<Vec<BudgetWithStatus>> {
        let budgets = self.storage.budgets.get_by_user(user_id, period)?;
        let mut result = Vec::with_capacity(budgets.len());

        for budget in budgets {
            let Some(category) = self.storage.categories.get(budget.category_id)? else {
                warn!(budget = %budget.id, "skipping budget whose category is missing");
                continue;
            };
            let status = self.status(&budget)?;
            result.push(BudgetWithStatus {
                budget,
                category,
                status,
            });
        }

        result.sort_by(|a, b| {
            b.budget
                .period
                .cmp(&a.budget.period)
                .then_with(|| a.category.name.to_lowercase().cmp(&b.category.name.to_lowercase()))
        });
        Ok(result)
    }

    /// Budgets of `period` whose spending reached their alert threshold
    pub fn alerts(&self, user_id: UserId, period: Period) -> MonetaResult<Vec<BudgetWithStatus>> {
        Ok(self
            .list_with_status(user_id, Some(period))?
            .into_iter()
            .filter(|b| b.status.over_threshold)
            .collect())
    }
}
