//! Moneta - personal finance tracker
//!
//! This library provides the core functionality of the Moneta command line
//! application: users record income and expenses by category, set monthly
//! budgets on expense categories and get alerted when spending reaches a
//! budget's threshold. Dashboards and period reports are built from the
//! same aggregation engine.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, categories, transactions, budgets)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer and aggregation engine
//! - `audit`: Audit logging system
//! - `reports`: Dashboard and period reports
//! - `export`: CSV, JSON and YAML exports
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use moneta::config::{paths::MonetaPaths, settings::Settings};
//! use moneta::storage::Storage;
//!
//! let paths = MonetaPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{MonetaError, MonetaResult};
