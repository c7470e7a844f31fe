//! YAML Export functionality
//!
//! Exports a user's data to YAML for human-readable backups.

use std::io::Write;

use crate::error::MonetaResult;
use crate::export::json::UserExport;
use crate::models::User;
use crate::storage::Storage;

/// Export a user's data to YAML
pub fn export_user_yaml<W: Write>(storage: &Storage, user: &User, mut writer: W) -> MonetaResult<()> {
    let export = UserExport::from_storage(storage, user)?;

    writeln!(writer, "# Moneta export of user {}", export.user.username)?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export)?;

    Ok(())
}
