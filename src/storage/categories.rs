//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MonetaError;
use crate::models::{Category, CategoryId, EntryType, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

fn sort_for_display(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.created_at.cmp(&b.created_at))
    });
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), MonetaError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), MonetaError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        sort_for_display(&mut list);

        write_json_atomic(&self.path, &CategoryData { categories: list })
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, MonetaError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// Every stored category, across users
    pub fn get_all(&self) -> Result<Vec<Category>, MonetaError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        sort_for_display(&mut list);
        Ok(list)
    }

    /// A user's categories ordered by name, optionally of one type
    pub fn get_by_user(
        &self,
        user_id: UserId,
        kind: Option<EntryType>,
    ) -> Result<Vec<Category>, MonetaError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories
            .values()
            .filter(|c| c.user_id == user_id && kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect();
        sort_for_display(&mut list);
        Ok(list)
    }

    /// Find a user's category by name (ignoring case), optionally of one type
    ///
    /// When a name exists as both income and expense and no type is given,
    /// the expense category wins.
    pub fn get_by_name(
        &self,
        user_id: UserId,
        name: &str,
        kind: Option<EntryType>,
    ) -> Result<Option<Category>, MonetaError> {
        let mut matches = self.get_by_user(user_id, kind)?;
        matches.retain(|c| c.name_matches(name));
        matches.sort_by_key(|c| c.kind.is_income());
        Ok(matches.into_iter().next())
    }

    /// Insert or update a category
    pub fn upsert(&self, category: Category) -> Result<(), MonetaError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.insert(category.id, category);
        Ok(())
    }

    /// Remove a category, returning it if it existed
    pub fn delete(&self, id: CategoryId) -> Result<Option<Category>, MonetaError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(categories.remove(&id))
    }

    /// Remove all of a user's categories, returning them
    pub fn delete_for_user(&self, user_id: UserId) -> Result<Vec<Category>, MonetaError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids: Vec<_> = categories
            .values()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.id)
            .collect();

        Ok(ids.iter().filter_map(|id| categories.remove(id)).collect())
    }

    pub fn count(&self) -> Result<usize, MonetaError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_get_by_user_filters_and_sorts() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let other = UserId::new();

        repo.upsert(Category::new(user, "Transport", EntryType::Expense)).unwrap();
        repo.upsert(Category::new(user, "alimentation", EntryType::Expense)).unwrap();
        repo.upsert(Category::new(user, "Salary", EntryType::Income)).unwrap();
        repo.upsert(Category::new(other, "Rent", EntryType::Expense)).unwrap();

        let all: Vec<_> = repo
            .get_by_user(user, None)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(all, ["alimentation", "Salary", "Transport"]);

        let expenses = repo.get_by_user(user, Some(EntryType::Expense)).unwrap();
        assert_eq!(expenses.len(), 2);
    }

    #[test]
    fn test_get_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let income = Category::new(user, "Other", EntryType::Income);
        let expense = Category::new(user, "Other", EntryType::Expense);
        let income_id = income.id;
        let expense_id = expense.id;
        repo.upsert(income).unwrap();
        repo.upsert(expense).unwrap();

        let found = repo.get_by_name(user, "other", None).unwrap().unwrap();
        assert_eq!(found.id, expense_id);

        let found = repo
            .get_by_name(user, "OTHER", Some(EntryType::Income))
            .unwrap()
            .unwrap();
        assert_eq!(found.id, income_id);

        assert!(repo.get_by_name(UserId::new(), "Other", None).unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let category = Category::new(UserId::new(), "Health", EntryType::Expense);
        let id = category.id;
        repo.upsert(category).unwrap();
        repo.save().unwrap();

        let reloaded = CategoryRepository::new(temp_dir.path().join("categories.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().unwrap().name, "Health");
    }

    #[test]
    fn test_delete_for_user() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        repo.upsert(Category::new(user, "A", EntryType::Expense)).unwrap();
        repo.upsert(Category::new(user, "B", EntryType::Income)).unwrap();
        repo.upsert(Category::new(UserId::new(), "C", EntryType::Expense)).unwrap();

        assert_eq!(repo.delete_for_user(user).unwrap().len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }
}
