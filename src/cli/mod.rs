//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod budget;
pub mod category;
pub mod export;
pub mod report;
pub mod transaction;
pub mod user;

pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_dashboard_command, handle_report_command, ReportArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use user::{handle_user_command, UserCommands};

use chrono::NaiveDate;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::settings::Settings;
use crate::error::{MonetaError, MonetaResult};
use crate::models::{EntryType, Money, Period, User};
use crate::services::UserService;
use crate::storage::Storage;

/// The user commands act on: `--user`, else the configured default
pub fn current_user(
    storage: &Storage,
    settings: &Settings,
    requested: Option<&str>,
) -> MonetaResult<User> {
    let name = requested
        .or(settings.default_user.as_deref())
        .ok_or_else(|| {
            MonetaError::Config(
                "No user selected. Pass --user <name> or run 'moneta user use <name>'".into(),
            )
        })?;
    UserService::new(storage).resolve(name)
}

pub(crate) fn parse_money(s: &str) -> MonetaResult<Money> {
    Money::parse(s).map_err(|e| MonetaError::Validation(format!("Invalid amount: {}", e)))
}

pub(crate) fn parse_date(s: &str) -> MonetaResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        MonetaError::Validation(format!("Invalid date: {}. Use YYYY-MM-DD", s))
    })
}

pub(crate) fn parse_period(s: &str) -> MonetaResult<Period> {
    Period::parse(s).map_err(|e| {
        MonetaError::Validation(format!("Invalid month: {}. Use YYYY-MM (e.g. 2026-01)", e))
    })
}

pub(crate) fn parse_kind(s: &str) -> MonetaResult<EntryType> {
    s.parse::<EntryType>().map_err(MonetaError::Validation)
}

/// Parse an optional goal, where "none" clears it
pub(crate) fn parse_goal(s: &str) -> MonetaResult<Option<Money>> {
    if s.trim().eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_money(s).map(Some)
    }
}

pub(crate) fn create_output(path: &Path) -> MonetaResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        MonetaError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MonetaPaths;
    use tempfile::TempDir;

    #[test]
    fn test_parsers() {
        assert_eq!(parse_money("12.5").unwrap(), Money::from_cents(1250));
        assert!(parse_money("abc").unwrap_err().is_validation());
        assert_eq!(parse_date("2026-01-31").unwrap().to_string(), "2026-01-31");
        assert!(parse_date("31/01/2026").is_err());
        assert_eq!(parse_period("2026-02").unwrap().to_string(), "2026-02");
        assert_eq!(parse_kind("expense").unwrap(), EntryType::Expense);
        assert!(parse_kind("transfer").is_err());
        assert_eq!(parse_goal("None").unwrap(), None);
        assert_eq!(parse_goal("100").unwrap(), Some(Money::from_cents(10000)));
    }

    #[test]
    fn test_current_user_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MonetaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        UserService::new(&storage).create("alice", None).unwrap();

        let mut settings = Settings::default();
        assert!(matches!(
            current_user(&storage, &settings, None).unwrap_err(),
            MonetaError::Config(_)
        ));

        settings.default_user = Some("alice".into());
        assert_eq!(current_user(&storage, &settings, None).unwrap().username, "alice");
        assert!(current_user(&storage, &settings, Some("bob"))
            .unwrap_err()
            .is_not_found());
    }
}
