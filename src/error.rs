//! Custom error types for Moneta
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::transaction::TransactionValidationError;
use crate::models::EntryType;

/// The main error type for Moneta operations
#[derive(Error, Debug)]
pub enum MonetaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A transaction's type disagrees with its category's type
    #[error(
        "Transaction type {transaction_type} does not match category '{category}' ({category_type})"
    )]
    TypeMismatch {
        category: String,
        category_type: EntryType,
        transaction_type: EntryType,
    },

    /// Budget-related errors
    #[error("Budget error: {0}")]
    Budget(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MonetaError {
    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::TypeMismatch { .. })
    }
}

impl From<std::io::Error> for MonetaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MonetaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for MonetaError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for MonetaError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<TransactionValidationError> for MonetaError {
    fn from(err: TransactionValidationError) -> Self {
        match err {
            TransactionValidationError::TypeMismatch {
                category,
                category_type,
                transaction_type,
            } => Self::TypeMismatch {
                category,
                category_type,
                transaction_type,
            },
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Result type alias for Moneta operations
pub type MonetaResult<T> = Result<T, MonetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonetaError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = MonetaError::category_not_found("Groceries");
        assert_eq!(err.to_string(), "Category not found: Groceries");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_type_mismatch_error() {
        let err = MonetaError::TypeMismatch {
            category: "Salary".into(),
            category_type: EntryType::Income,
            transaction_type: EntryType::Expense,
        };
        assert_eq!(
            err.to_string(),
            "Transaction type EXPENSE does not match category 'Salary' (INCOME)"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MonetaError = io_err.into();
        assert!(matches!(err, MonetaError::Io(_)));
    }
}
