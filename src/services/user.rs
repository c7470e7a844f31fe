//! User service
//!
//! Creation, lookup and profile management of users, and removal of a user
//! together with everything they own.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{MonetaError, MonetaResult};
use crate::models::{Currency, Money, User, UserId};
use crate::services::unique_id_match;
use crate::storage::Storage;

/// Profile changes; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub currency: Option<Currency>,
    /// `Some(None)` clears the goal
    pub monthly_income_goal: Option<Option<Money>>,
    /// `Some(None)` clears the goal
    pub monthly_savings_goal: Option<Option<Money>>,
}

/// What was removed along with a user
#[derive(Debug, Clone)]
pub struct UserDeletion {
    pub user: User,
    pub categories: usize,
    pub transactions: usize,
    pub budgets: usize,
}

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a user; usernames are unique ignoring case
    pub fn create(&self, username: &str, currency: Option<Currency>) -> MonetaResult<User> {
        let mut user = User::new(username);
        if let Some(currency) = currency {
            user.currency = currency;
        }

        user.validate()
            .map_err(|e| MonetaError::Validation(e.to_string()))?;

        if self.storage.users.get_by_name(&user.username)?.is_some() {
            return Err(MonetaError::Duplicate {
                entity_type: "User",
                identifier: user.username,
            });
        }

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &user,
        )?;
        info!(user = %user.username, "user created");

        Ok(user)
    }

    pub fn get(&self, id: UserId) -> MonetaResult<Option<User>> {
        self.storage.users.get(id)
    }

    /// Find a user by username or by (short) id
    pub fn find(&self, identifier: &str) -> MonetaResult<Option<User>> {
        if let Some(user) = self.storage.users.get_by_name(identifier)? {
            return Ok(Some(user));
        }

        unique_id_match(
            "User",
            identifier,
            self.storage.users.get_all()?,
            |u| u.id.matches(identifier),
        )
    }

    /// Like `find`, but a missing user is an error
    pub fn resolve(&self, identifier: &str) -> MonetaResult<User> {
        self.find(identifier)?
            .ok_or_else(|| MonetaError::user_not_found(identifier))
    }

    pub fn list(&self) -> MonetaResult<Vec<User>> {
        self.storage.users.get_all()
    }

    /// Apply profile changes
    pub fn update_profile(&self, id: UserId, update: ProfileUpdate) -> MonetaResult<User> {
        let mut user = self
            .storage
            .users
            .get(id)?
            .ok_or_else(|| MonetaError::user_not_found(id.to_string()))?;
        let before = user.clone();

        if let Some(currency) = update.currency {
            user.currency = currency;
        }
        if let Some(goal) = update.monthly_income_goal {
            user.monthly_income_goal = goal;
        }
        if let Some(goal) = update.monthly_savings_goal {
            user.monthly_savings_goal = goal;
        }
        user.updated_at = chrono::Utc::now();

        user.validate()
            .map_err(|e| MonetaError::Validation(e.to_string()))?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &before,
            &user,
        )?;

        Ok(user)
    }

    /// Delete a user with all of their categories, transactions and budgets
    pub fn delete(&self, id: UserId) -> MonetaResult<UserDeletion> {
        let user = self
            .storage
            .users
            .get(id)?
            .ok_or_else(|| MonetaError::user_not_found(id.to_string()))?;

        let budgets = self.storage.budgets.delete_for_user(id)?;
        let transactions = self.storage.transactions.delete_for_user(id)?;
        let categories = self.storage.categories.delete_for_user(id)?;
        self.storage.users.delete(id)?;
        self.storage.save_all()?;

        self.storage.log_delete(
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &user,
        )?;
        info!(
            user = %user.username,
            categories = categories.len(),
            transactions = transactions.len(),
            budgets = budgets.len(),
            "user deleted"
        );

        Ok(UserDeletion {
            user,
            categories: categories.len(),
            transactions: transactions.len(),
            budgets: budgets.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MonetaPaths;
    use crate::models::{Category, EntryType, Transaction};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MonetaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_user() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let user = service.create("alice", Some(Currency::Usd)).unwrap();
        assert_eq!(user.currency, Currency::Usd);
        assert_eq!(storage.audit().entry_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        service.create("alice", None).unwrap();
        let err = service.create("ALICE", None).unwrap_err();
        assert!(matches!(err, MonetaError::Duplicate { .. }));
    }

    #[test]
    fn test_invalid_username_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        assert!(service.create("", None).unwrap_err().is_validation());
        assert!(service.create("two words", None).unwrap_err().is_validation());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let user = service.create("bob", None).unwrap();

        assert_eq!(service.find("Bob").unwrap().unwrap().id, user.id);
        assert_eq!(service.find(&user.id.to_string()).unwrap().unwrap().id, user.id);
        assert!(service.resolve("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_profile_sets_and_clears_goals() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let user = service.create("carol", None).unwrap();

        let updated = service
            .update_profile(
                user.id,
                ProfileUpdate {
                    currency: Some(Currency::Xof),
                    monthly_income_goal: Some(Some(Money::from_cents(300000))),
                    monthly_savings_goal: Some(Some(Money::from_cents(50000))),
                },
            )
            .unwrap();
        assert_eq!(updated.currency, Currency::Xof);
        assert_eq!(updated.monthly_income_goal, Some(Money::from_cents(300000)));

        let cleared = service
            .update_profile(
                user.id,
                ProfileUpdate {
                    monthly_income_goal: Some(None),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        assert!(cleared.monthly_income_goal.is_none());
        assert_eq!(cleared.monthly_savings_goal, Some(Money::from_cents(50000)));
        assert_eq!(cleared.currency, Currency::Xof);

        let entries = storage.audit().read_all().unwrap();
        assert!(entries[1]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("currency: \"EUR\" -> \"XOF\""));
    }

    #[test]
    fn test_negative_goal_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let user = service.create("dave", None).unwrap();

        let err = service
            .update_profile(
                user.id,
                ProfileUpdate {
                    monthly_savings_goal: Some(Some(Money::from_cents(-100))),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let user = service.create("erin", None).unwrap();
        let other = service.create("frank", None).unwrap();

        let category = Category::new(user.id, "Food", EntryType::Expense);
        storage.categories.upsert(category.clone()).unwrap();
        storage
            .transactions
            .upsert(Transaction::with_details(
                user.id,
                EntryType::Expense,
                Money::from_cents(100),
                chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                Some(category.id),
                "",
            ))
            .unwrap();
        storage
            .categories
            .upsert(Category::new(other.id, "Food", EntryType::Expense))
            .unwrap();

        let deletion = service.delete(user.id).unwrap();
        assert_eq!(deletion.categories, 1);
        assert_eq!(deletion.transactions, 1);
        assert!(service.get(user.id).unwrap().is_none());
        assert_eq!(storage.categories.count().unwrap(), 1);
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }
}
