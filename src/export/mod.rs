//! Export module for Moneta
//!
//! Exports a user's data in several formats:
//! - CSV: transactions, for spreadsheets
//! - JSON: everything the user owns, machine-readable
//! - YAML: the same content, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_transactions_csv;
pub use self::json::{export_user_json, UserExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_user_yaml;
