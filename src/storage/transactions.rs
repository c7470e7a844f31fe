//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with
//! per-user and per-category indexes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MonetaError;
use crate::models::{CategoryId, Transaction, TransactionId, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Newest first: date descending, then creation time descending
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
    });
}

type Index<K> = HashMap<K, Vec<TransactionId>>;

fn unindex<K: std::hash::Hash + Eq>(index: &mut Index<K>, key: &K, id: TransactionId) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|&t| t != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: user_id -> transaction_ids
    by_user: RwLock<Index<UserId>>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<Index<CategoryId>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), MonetaError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_user.clear();
        by_category.clear();

        for txn in file_data.transactions {
            by_user.entry(txn.user_id).or_default().push(txn.id);
            if let Some(category_id) = txn.category_id {
                by_category.entry(category_id).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Every stored transaction, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// A user's transactions, newest first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_user = self
            .by_user
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Transactions filed under a category, newest first
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_category = self
            .by_category
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Insert or update a transaction, keeping the indexes in step
    pub fn upsert(&self, txn: Transaction) -> Result<(), MonetaError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&txn.id) {
            unindex(&mut by_user, &old.user_id, txn.id);
            if let Some(category_id) = old.category_id {
                unindex(&mut by_category, &category_id, txn.id);
            }
        }

        by_user.entry(txn.user_id).or_default().push(txn.id);
        if let Some(category_id) = txn.category_id {
            by_category.entry(category_id).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Remove a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, MonetaError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            unindex(&mut by_user, &txn.user_id, id);
            if let Some(category_id) = txn.category_id {
                unindex(&mut by_category, &category_id, id);
            }
        }
        Ok(removed)
    }

    /// Detach every transaction from a deleted category
    ///
    /// Returns the (before, after) pairs of the transactions that changed.
    pub fn clear_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<(Transaction, Transaction)>, MonetaError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids = by_category.remove(&category_id).unwrap_or_default();
        let now = chrono::Utc::now();

        let mut changed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(txn) = data.get_mut(&id) {
                let before = txn.clone();
                txn.category_id = None;
                txn.updated_at = now;
                changed.push((before, txn.clone()));
            }
        }
        Ok(changed)
    }

    /// Remove all of a user's transactions, returning them
    pub fn delete_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, MonetaError> {
        let ids = {
            let by_user = self
                .by_user
                .read()
                .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;
            by_user.get(&user_id).cloned().unwrap_or_default()
        };

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(txn) = self.delete(id)? {
                removed.push(txn);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryType, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn expense(user: UserId, category: Option<CategoryId>, day: u32, cents: i64) -> Transaction {
        Transaction::with_details(
            user,
            EntryType::Expense,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            category,
            "",
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_get_by_user_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();

        repo.upsert(expense(user, None, 5, 100)).unwrap();
        repo.upsert(expense(user, None, 20, 200)).unwrap();
        repo.upsert(expense(user, None, 12, 300)).unwrap();
        repo.upsert(expense(UserId::new(), None, 25, 400)).unwrap();

        let amounts: Vec<_> = repo
            .get_by_user(user)
            .unwrap()
            .iter()
            .map(|t| t.amount.cents())
            .collect();
        assert_eq!(amounts, [200, 300, 100]);
    }

    #[test]
    fn test_same_day_ordered_by_creation() {
        let mut first = expense(UserId::new(), None, 10, 100);
        let mut second = first.clone();
        second.id = TransactionId::new();
        first.created_at = chrono::Utc::now() - chrono::Duration::seconds(5);
        second.created_at = chrono::Utc::now();

        let mut list = vec![first.clone(), second.clone()];
        sort_newest_first(&mut list);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[test]
    fn test_upsert_reindexes_category() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let food = CategoryId::new();
        let fun = CategoryId::new();

        let mut txn = expense(user, Some(food), 3, 1500);
        repo.upsert(txn.clone()).unwrap();
        assert_eq!(repo.get_by_category(food).unwrap().len(), 1);

        txn.category_id = Some(fun);
        repo.upsert(txn).unwrap();
        assert!(repo.get_by_category(food).unwrap().is_empty());
        assert_eq!(repo.get_by_category(fun).unwrap().len(), 1);
        assert_eq!(repo.get_by_user(user).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_category() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let food = CategoryId::new();

        repo.upsert(expense(user, Some(food), 1, 100)).unwrap();
        repo.upsert(expense(user, Some(food), 2, 200)).unwrap();
        repo.upsert(expense(user, None, 3, 300)).unwrap();

        let changed = repo.clear_category(food).unwrap();
        assert_eq!(changed.len(), 2);
        assert!(changed.iter().all(|(before, after)| {
            before.category_id == Some(food) && after.category_id.is_none()
        }));

        assert!(repo.get_by_category(food).unwrap().is_empty());
        assert!(repo
            .get_by_user(user)
            .unwrap()
            .iter()
            .all(|t| t.category_id.is_none()));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let food = CategoryId::new();
        let txn = expense(user, Some(food), 15, 35050);
        let id = txn.id;

        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        reloaded.load().unwrap();

        assert_eq!(reloaded.get(id).unwrap().unwrap().amount.cents(), 35050);
        assert_eq!(reloaded.get_by_user(user).unwrap().len(), 1);
        assert_eq!(reloaded.get_by_category(food).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_and_delete_for_user() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let txn = expense(user, None, 1, 100);
        let id = txn.id;
        repo.upsert(txn).unwrap();
        repo.upsert(expense(user, None, 2, 200)).unwrap();
        repo.upsert(expense(UserId::new(), None, 3, 300)).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert_eq!(repo.delete_for_user(user).unwrap().len(), 1);
        assert_eq!(repo.count().unwrap(), 1);
    }
}
