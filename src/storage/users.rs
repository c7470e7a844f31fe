//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MonetaError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), MonetaError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All users ordered by username
    pub fn get_all(&self) -> Result<Vec<User>, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by_key(|u| u.username.to_lowercase());
        Ok(users)
    }

    /// Find a user by username, ignoring case
    pub fn get_by_name(&self, username: &str) -> Result<Option<User>, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|u| u.name_matches(username)).cloned())
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> Result<(), MonetaError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(user.id, user);
        Ok(())
    }

    /// Remove a user, returning it if it existed
    pub fn delete(&self, id: UserId) -> Result<Option<User>, MonetaError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, MonetaError> {
        let data = self
            .data
            .read()
            .map_err(|e| MonetaError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
