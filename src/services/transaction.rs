//! Transaction service
//!
//! Provides business logic for recording, editing, listing and deleting
//! transactions. Every write checks that the category (if any) belongs to
//! the same user and has the same entry type as the transaction.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{MonetaError, MonetaResult};
use crate::models::{CategoryId, EntryType, Money, Transaction, TransactionId, UserId};
use crate::services::aggregation::{self, TransactionFilter};
use crate::services::unique_id_match;
use crate::storage::Storage;

/// Input for creating a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub kind: EntryType,
    pub amount: Money,
    pub date: NaiveDate,
    pub category_id: Option<CategoryId>,
    pub description: String,
}

/// Changes to an existing transaction; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<EntryType>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    /// `Some(None)` removes the category
    pub category_id: Option<Option<CategoryId>>,
    pub description: Option<String>,
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate amount and category of a transaction about to be stored
    fn check(&self, txn: &Transaction) -> MonetaResult<()> {
        txn.validate()?;

        if let Some(category_id) = txn.category_id {
            let category = self
                .storage
                .categories
                .get(category_id)?
                .ok_or_else(|| MonetaError::category_not_found(category_id.to_string()))?;
            txn.check_category(&category)?;
        }

        Ok(())
    }

    /// Record a new transaction
    pub fn create(&self, input: NewTransaction) -> MonetaResult<Transaction> {
        if self.storage.users.get(input.user_id)?.is_none() {
            return Err(MonetaError::user_not_found(input.user_id.to_string()));
        }

        let txn = Transaction::with_details(
            input.user_id,
            input.kind,
            input.amount,
            input.date,
            input.category_id,
            input.description.trim(),
        );
        self.check(&txn)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.to_string()),
            &txn,
        )?;
        info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction recorded");

        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> MonetaResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find one of a user's transactions by (short) id
    pub fn find(&self, user_id: UserId, identifier: &str) -> MonetaResult<Option<Transaction>> {
        unique_id_match(
            "Transaction",
            identifier,
            self.storage.transactions.get_by_user(user_id)?,
            |t| t.id.matches(identifier),
        )
    }

    /// Like `find`, but a missing transaction is an error
    pub fn resolve(&self, user_id: UserId, identifier: &str) -> MonetaResult<Transaction> {
        self.find(user_id, identifier)?
            .ok_or_else(|| MonetaError::transaction_not_found(identifier))
    }

    /// Transactions matching `filter`, newest first
    pub fn list(&self, filter: &TransactionFilter) -> MonetaResult<Vec<Transaction>> {
        let candidates = match filter.category_id {
            Some(category_id) => self.storage.transactions.get_by_category(category_id)?,
            None => match filter.user_id {
                Some(user_id) => self.storage.transactions.get_by_user(user_id)?,
                None => self.storage.transactions.get_all()?,
            },
        };
        Ok(aggregation::select(&candidates, filter))
    }

    /// The user's `count` most recent transactions
    pub fn recent(&self, user_id: UserId, count: usize) -> MonetaResult<Vec<Transaction>> {
        self.list(&TransactionFilter::for_user(user_id).limit(count))
    }

    /// Edit a transaction; the result is validated like a new one
    pub fn update(&self, id: TransactionId, update: TransactionUpdate) -> MonetaResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| MonetaError::transaction_not_found(id.to_string()))?;
        let before = txn.clone();

        if let Some(kind) = update.kind {
            txn.kind = kind;
        }
        if let Some(amount) = update.amount {
            txn.amount = amount;
        }
        if let Some(date) = update.date {
            txn.date = date;
        }
        if let Some(category_id) = update.category_id {
            txn.category_id = category_id;
        }
        if let Some(description) = update.description {
            txn.description = description.trim().to_string();
        }
        txn.updated_at = chrono::Utc::now();

        self.check(&txn)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.to_string()),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    pub fn delete(&self, id: TransactionId) -> MonetaResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| MonetaError::transaction_not_found(id.to_string()))?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.to_string()),
            &txn,
        )?;
        info!(id = %txn.id, "transaction deleted");

        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MonetaPaths;
    use crate::models::{Category, Period, User};
    use tempfile::TempDir;

    struct Setup {
        _temp_dir: TempDir,
        storage: Storage,
        user: UserId,
        food: Category,
        salary: Category,
    }

    fn setup() -> Setup {
        let temp_dir = TempDir::new().unwrap();
        let paths = MonetaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let user = User::new("tester");
        let user_id = user.id;
        storage.users.upsert(user).unwrap();

        let food = Category::new(user_id, "Food", EntryType::Expense);
        let salary = Category::new(user_id, "Salary", EntryType::Income);
        storage.categories.upsert(food.clone()).unwrap();
        storage.categories.upsert(salary.clone()).unwrap();

        Setup {
            _temp_dir: temp_dir,
            storage,
            user: user_id,
            food,
            salary,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(s: &Setup, cents: i64, on: NaiveDate) -> NewTransaction {
        NewTransaction {
            user_id: s.user,
            kind: EntryType::Expense,
            amount: Money::from_cents(cents),
            date: on,
            category_id: Some(s.food.id),
            description: "groceries".into(),
        }
    }

    #[test]
    fn test_create_transaction() {
        let s = setup();
        let service = TransactionService::new(&s.storage);

        let txn = service.create(expense(&s, 1250, date(2026, 1, 5))).unwrap();
        assert_eq!(txn.category_id, Some(s.food.id));
        assert_eq!(service.get(txn.id).unwrap().unwrap().amount.cents(), 1250);
    }

    #[test]
    fn test_ambiguous_short_id_rejected() {
        let s = setup();
        let service = TransactionService::new(&s.storage);
        let txn = service.create(expense(&s, 1250, date(2026, 1, 5))).unwrap();

        for suffix in ["000000000001", "000000000002"] {
            let mut twin = txn.clone();
            twin.id = TransactionId::from(
                uuid::Uuid::parse_str(&format!("1a2b3c4d-0000-4000-8000-{}", suffix)).unwrap(),
            );
            s.storage.transactions.upsert(twin).unwrap();
        }

        let err = service.resolve(s.user, "txn-1a2b3c4d").unwrap_err();
        assert!(err.is_validation());
        assert!(service.delete(txn.id).is_ok());

        let found = service.resolve(s.user, "1a2b3c4d-0000-4000-8000-000000000002").unwrap();
        assert_eq!(found.id.as_uuid().to_string(), "1a2b3c4d-0000-4000-8000-000000000002");
        assert!(service.find(s.user, &txn.id.to_string()).unwrap().is_none());
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let s = setup();
        let service = TransactionService::new(&s.storage);

        let mut input = expense(&s, 1250, date(2026, 1, 5));
        input.category_id = Some(s.salary.id);

        let err = service.create(input).unwrap_err();
        assert!(matches!(err, MonetaError::TypeMismatch { .. }));
        assert_eq!(s.storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_amount_must_be_positive() {
        let s = setup();
        let service = TransactionService::new(&s.storage);

        let err = service.create(expense(&s, 0, date(2026, 1, 5))).unwrap_err();
        assert!(matches!(err, MonetaError::Validation(_)));
    }

    #[test]
    fn test_foreign_category_rejected() {
        let s = setup();
        let service = TransactionService::new(&s.storage);

        let stranger = Category::new(UserId::new(), "Theirs", EntryType::Expense);
        s.storage.categories.upsert(stranger.clone()).unwrap();

        let mut input = expense(&s, 100, date(2026, 1, 5));
        input.category_id = Some(stranger.id);
        assert!(service.create(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_revalidates() {
        let s = setup();
        let service = TransactionService::new(&s.storage);
        let txn = service.create(expense(&s, 1250, date(2026, 1, 5))).unwrap();

        let err = service
            .update(
                txn.id,
                TransactionUpdate {
                    kind: Some(EntryType::Income),
                    ..TransactionUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, MonetaError::TypeMismatch { .. }));

        let updated = service
            .update(
                txn.id,
                TransactionUpdate {
                    kind: Some(EntryType::Income),
                    category_id: Some(Some(s.salary.id)),
                    amount: Some(Money::from_cents(250000)),
                    ..TransactionUpdate::default()
                },
            )
            .unwrap();
        assert!(updated.is_income());
        assert_eq!(updated.amount.cents(), 250000);

        let uncategorized = service
            .update(
                txn.id,
                TransactionUpdate {
                    category_id: Some(None),
                    ..TransactionUpdate::default()
                },
            )
            .unwrap();
        assert!(uncategorized.category_id.is_none());
    }

    #[test]
    fn test_list_filters_and_orders() {
        let s = setup();
        let service = TransactionService::new(&s.storage);
        service.create(expense(&s, 100, date(2025, 12, 20))).unwrap();
        service.create(expense(&s, 200, date(2026, 1, 2))).unwrap();
        service.create(expense(&s, 300, date(2026, 1, 28))).unwrap();
        service
            .create(NewTransaction {
                user_id: s.user,
                kind: EntryType::Income,
                amount: Money::from_cents(250000),
                date: date(2026, 1, 1),
                category_id: Some(s.salary.id),
                description: String::new(),
            })
            .unwrap();

        let jan_expenses = service
            .list(
                &TransactionFilter::for_user(s.user)
                    .kind(EntryType::Expense)
                    .period(Period::parse("2026-01").unwrap()),
            )
            .unwrap();
        let amounts: Vec<_> = jan_expenses.iter().map(|t| t.amount.cents()).collect();
        assert_eq!(amounts, [300, 200]);

        let by_category = service
            .list(&TransactionFilter::for_user(s.user).category(s.food.id))
            .unwrap();
        assert_eq!(by_category.len(), 3);

        let recent = service.recent(s.user, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, date(2026, 1, 28));
    }

    #[test]
    fn test_find_and_delete() {
        let s = setup();
        let service = TransactionService::new(&s.storage);
        let txn = service.create(expense(&s, 100, date(2026, 1, 2))).unwrap();

        let found = service.resolve(s.user, &txn.id.to_string()).unwrap();
        assert_eq!(found.id, txn.id);
        assert!(service.find(UserId::new(), &txn.id.to_string()).unwrap().is_none());

        service.delete(txn.id).unwrap();
        assert!(service.get(txn.id).unwrap().is_none());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }
}
