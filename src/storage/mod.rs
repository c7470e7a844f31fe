//! Storage layer for Moneta
//!
//! Provides JSON file storage with atomic writes, in-memory repositories
//! guarded by `RwLock`, and the audit trail for every mutation.

pub mod budget;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod transactions;
pub mod users;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use serde::Serialize;
use tracing::debug;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::MonetaPaths;
use crate::error::{MonetaError, MonetaResult};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: MonetaPaths,
    audit: AuditLogger,
    pub users: UserRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    /// Create a Storage rooted at `paths`, creating its directories
    pub fn new(paths: MonetaPaths) -> Result<Self, MonetaError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            users: UserRepository::new(paths.users_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &MonetaPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), MonetaError> {
        self.users.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        self.budgets.load()?;

        debug!(
            users = self.users.count()?,
            categories = self.categories.count()?,
            transactions = self.transactions.count()?,
            budgets = self.budgets.count()?,
            "ledger loaded"
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), MonetaError> {
        self.users.save()?;
        self.categories.save()?;
        self.transactions.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// Whether `moneta init` has been run for this data directory
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> MonetaResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an updated entity, with a summary of the changed fields
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> MonetaResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a deleted entity in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> MonetaResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
