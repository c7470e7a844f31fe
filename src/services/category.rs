//! Category service
//!
//! Provides business logic for category management: creation with per-user
//! uniqueness, lookup by name or id, styling updates and deletion with its
//! effects on transactions and budgets.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{MonetaError, MonetaResult};
use crate::models::{Category, CategoryId, EntryType, UserId};
use crate::services::unique_id_match;
use crate::storage::Storage;

/// Changes to an existing category; `None` leaves a field as it is
///
/// The entry type is fixed at creation, since existing transactions and
/// budgets depend on it.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// What deleting a category touched
#[derive(Debug, Clone)]
pub struct CategoryDeletion {
    pub category: Category,
    /// Transactions left without a category
    pub uncategorized: usize,
    /// Budgets removed with the category
    pub budgets_removed: usize,
}

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a category, unique per (user, name, type)
    pub fn create(
        &self,
        user_id: UserId,
        name: &str,
        kind: EntryType,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> MonetaResult<Category> {
        if self.storage.users.get(user_id)?.is_none() {
            return Err(MonetaError::user_not_found(user_id.to_string()));
        }

        let mut category = Category::new(user_id, name.trim(), kind);
        if let Some(icon) = icon {
            category.icon = icon.trim().to_string();
        }
        if let Some(color) = color {
            category.color = color.trim().to_string();
        }

        category
            .validate()
            .map_err(|e| MonetaError::Validation(e.to_string()))?;
        self.ensure_unique(&category)?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(category = %category.name, kind = %category.kind, "category created");

        Ok(category)
    }

    fn ensure_unique(&self, category: &Category) -> MonetaResult<()> {
        match self
            .storage
            .categories
            .get_by_name(category.user_id, &category.name, Some(category.kind))?
        {
            Some(existing) if existing.id != category.id => Err(MonetaError::Duplicate {
                entity_type: "Category",
                identifier: format!("{} ({})", category.name, category.kind),
            }),
            _ => Ok(()),
        }
    }

    pub fn get(&self, id: CategoryId) -> MonetaResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find one of a user's categories by name or (short) id
    pub fn find(
        &self,
        user_id: UserId,
        identifier: &str,
        kind: Option<EntryType>,
    ) -> MonetaResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(user_id, identifier, kind)? {
            return Ok(Some(category));
        }

        unique_id_match(
            "Category",
            identifier,
            self.storage.categories.get_by_user(user_id, kind)?,
            |c| c.id.matches(identifier),
        )
    }

    /// Like `find`, but a missing category is an error
    pub fn resolve(
        &self,
        user_id: UserId,
        identifier: &str,
        kind: Option<EntryType>,
    ) -> MonetaResult<Category> {
        self.find(user_id, identifier, kind)?
            .ok_or_else(|| MonetaError::category_not_found(identifier))
    }

    /// A user's categories ordered by name, optionally of one type
    pub fn list(&self, user_id: UserId, kind: Option<EntryType>) -> MonetaResult<Vec<Category>> {
        self.storage.categories.get_by_user(user_id, kind)
    }

    /// Rename or restyle a category
    pub fn update(&self, id: CategoryId, update: CategoryUpdate) -> MonetaResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| MonetaError::category_not_found(id.to_string()))?;
        let before = category.clone();

        if let Some(name) = update.name {
            category.name = name.trim().to_string();
        }
        if let Some(icon) = update.icon {
            category.icon = icon.trim().to_string();
        }
        if let Some(color) = update.color {
            category.color = color.trim().to_string();
        }
        category.updated_at = chrono::Utc::now();

        category
            .validate()
            .map_err(|e| MonetaError::Validation(e.to_string()))?;
        self.ensure_unique(&category)?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Its transactions are kept without a category; its budgets are
    /// removed.
    pub fn delete(&self, id: CategoryId) -> MonetaResult<CategoryDeletion> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| MonetaError::category_not_found(id.to_string()))?;

        let detached = self.storage.transactions.clear_category(id)?;
        let budgets = self.storage.budgets.delete_for_category(id)?;
        self.storage.categories.delete(id)?;

        self.storage.transactions.save()?;
        self.storage.budgets.save()?;
        self.storage.categories.save()?;

        for (before, after) in &detached {
            self.storage.log_update(
                EntityType::Transaction,
                after.id.to_string(),
                None,
                before,
                after,
            )?;
        }
        for budget in &budgets {
            self.storage.log_delete(
                EntityType::Budget,
                budget.id.to_string(),
                Some(format!("{} {}", category.name, budget.period)),
                budget,
            )?;
        }
        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(
            category = %category.name,
            uncategorized = detached.len(),
            budgets_removed = budgets.len(),
            "category deleted"
        );

        Ok(CategoryDeletion {
            category,
            uncategorized: detached.len(),
            budgets_removed: budgets.len(),
        })
    }
}
