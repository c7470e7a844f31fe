//! User settings for Moneta
//!
//! Manages preferences such as the default user, dashboard window and the
//! default alert threshold for new budgets.

use serde::{Deserialize, Serialize};

use super::paths::MonetaPaths;
use crate::error::MonetaError;
use crate::services::aggregation::MAX_SERIES_MONTHS;

/// Settings for Moneta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// User selected when `--user` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,

    /// Alert threshold (percent) applied to budgets created without one
    #[serde(default = "default_alert_threshold")]
    pub default_alert_threshold: u8,

    /// Number of months in the dashboard income/expense series
    #[serde(default = "default_dashboard_months")]
    pub dashboard_months: usize,

    /// Number of recent transactions shown on the dashboard
    #[serde(default = "default_recent_transactions")]
    pub recent_transactions: usize,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_alert_threshold() -> u8 {
    crate::models::budget::DEFAULT_ALERT_THRESHOLD
}

fn default_dashboard_months() -> usize {
    6
}

fn default_recent_transactions() -> usize {
    10
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_user: None,
            default_alert_threshold: default_alert_threshold(),
            dashboard_months: default_dashboard_months(),
            recent_transactions: default_recent_transactions(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &MonetaPaths) -> Result<Self, MonetaError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| MonetaError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                MonetaError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MonetaPaths) -> Result<(), MonetaError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| MonetaError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| MonetaError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values the rest of the application cannot work with
    pub fn validate(&self) -> Result<(), MonetaError> {
        if self.default_alert_threshold > 100 {
            return Err(MonetaError::Config(format!(
                "default_alert_threshold must be between 0 and 100, got {}",
                self.default_alert_threshold
            )));
        }
        if self.dashboard_months == 0 || self.dashboard_months > MAX_SERIES_MONTHS {
            return Err(MonetaError::Config(format!(
                "dashboard_months must be between 1 and {}, got {}",
                MAX_SERIES_MONTHS, self.dashboard_months
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_alert_threshold, 80);
        assert_eq!(settings.dashboard_months, 6);
        assert_eq!(settings.recent_transactions, 10);
        assert!(settings.default_user.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MonetaPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_user = Some("alice".into());
        settings.dashboard_months = 12;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_user.as_deref(), Some("alice"));
        assert_eq!(loaded.dashboard_months, 12);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"default_user": "bob"}"#).unwrap();
        assert_eq!(settings.default_alert_threshold, 80);
        assert_eq!(settings.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MonetaPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"default_alert_threshold": 150}"#).unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(MonetaError::Config(_))
        ));
    }

    #[test]
    fn test_dashboard_months_bounded() {
        let mut settings = Settings::default();
        settings.dashboard_months = 120;
        assert!(settings.validate().is_ok());

        settings.dashboard_months = 121;
        assert!(matches!(settings.validate(), Err(MonetaError::Config(_))));
        settings.dashboard_months = 0;
        assert!(matches!(settings.validate(), Err(MonetaError::Config(_))));
    }
}
