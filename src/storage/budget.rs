//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MonetaError;
use crate::models::{Budget, BudgetId, CategoryId, Period, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), MonetaError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }

        Ok(())
    }

    /// Save budgets to disk, newest period first
    pub fn save(&self) -> Result<(), MonetaError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by(|a, b| b.period.cmp(&a.period).then(a.created_at.cmp(&b.created_at)));

        write_json_atomic(&self.path, &BudgetData { budgets: list })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, MonetaError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets.get(&id).cloned())
    }

    /// A user's budgets, newest period first, optionally for one period
    pub fn get_by_user(
        &self,
        user_id: UserId,
        period: Option<Period>,
    ) -> Result<Vec<Budget>, MonetaError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = budgets
            .values()
            .filter(|b| b.user_id == user_id && period.map_or(true, |p| b.period == p))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.period.cmp(&a.period).then(a.created_at.cmp(&b.created_at)));
        Ok(list)
    }

    /// The budget for (user, category, period), if one exists
    pub fn find(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        period: Period,
    ) -> Result<Option<Budget>, MonetaError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets
            .values()
            .find(|b| b.user_id == user_id && b.category_id == category_id && b.period == period)
            .cloned())
    }

    /// Insert or update a budget
    pub fn upsert(&self, budget: Budget) -> Result<(), MonetaError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.insert(budget.id, budget);
        Ok(())
    }

    /// Remove a budget, returning it if it existed
    pub fn delete(&self, id: BudgetId) -> Result<Option<Budget>, MonetaError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(budgets.remove(&id))
    }

    /// Remove every budget matching `predicate`, returning them
    fn delete_where<F>(&self, predicate: F) -> Result<Vec<Budget>, MonetaError>
    where
        F: Fn(&Budget) -> bool,
    {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids: Vec<_> = budgets
            .values()
            .filter(|b| predicate(b))
            .map(|b| b.id)
            .collect();

        Ok(ids.iter().filter_map(|id| budgets.remove(id)).collect())
    }

    /// Remove the budgets of a deleted category
    pub fn delete_for_category(&self, category_id: CategoryId) -> Result<Vec<Budget>, MonetaError> {
        self.delete_where(|b| b.category_id == category_id)
    }

    /// Remove all of a user's budgets
    pub fn delete_for_user(&self, user_id: UserId) -> Result<Vec<Budget>, MonetaError> {
        self.delete_where(|b| b.user_id == user_id)
    }

    pub fn count(&self) -> Result<usize, MonetaError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets.len())
    }
}
