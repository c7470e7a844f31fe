//! Configuration module for Moneta
//!
//! - Path resolution for configuration and ledger files
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::MonetaPaths;
pub use settings::Settings;
