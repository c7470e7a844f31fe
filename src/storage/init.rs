//! First-run setup of the data directory

use tracing::info;

use crate::config::paths::MonetaPaths;
use crate::config::settings::Settings;
use crate::error::MonetaError;

use super::file_io::write_json_atomic;

/// Prepare a data directory for use
///
/// Creates the directories, writes default settings and empty ledger files.
/// Files that already exist are left untouched, so running this twice is
/// harmless. Returns the settings in effect.
pub fn initialize_storage(paths: &MonetaPaths) -> Result<Settings, MonetaError> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    let empty_files = [
        (paths.users_file(), "users"),
        (paths.categories_file(), "categories"),
        (paths.transactions_file(), "transactions"),
        (paths.budgets_file(), "budgets"),
    ];
    for (path, key) in empty_files {
        if !path.exists() {
            write_json_atomic(&path, &serde_json::json!({ key: [] }))?;
        }
    }

    info!(base_dir = %paths.base_dir().display(), "data directory initialized");
    Ok(settings)
}

/// Whether the data directory still needs `initialize_storage`
pub fn needs_initialization(paths: &MonetaPaths) -> bool {
    !paths.is_initialized()
}
