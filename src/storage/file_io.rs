//! JSON file helpers with atomic writes

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::MonetaError;

/// Read JSON from `path`, or `T::default()` when the file doesn't exist yet
pub fn read_json<T, P>(path: P) -> Result<T, MonetaError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        debug!(path = %path.display(), "no data file, starting empty");
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| MonetaError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| MonetaError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to `path` through a temp file and a rename, so readers only
/// ever see the old or the new contents
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), MonetaError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MonetaError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| MonetaError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| MonetaError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .and_then(|_| writer.get_ref().sync_all())
        .map_err(|e| MonetaError::Storage(format!("Failed to flush data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        MonetaError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    debug!(path = %path.display(), "wrote data file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Ledger {
        owner: String,
        entries: Vec<i64>,
    }

    fn sample() -> Ledger {
        Ledger {
            owner: "demo".to_string(),
            entries: vec![250000, -35050],
        }
    }

    #[test]
    fn test_missing_file_reads_as_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: Ledger = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, Ledger::default());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");

        write_json_atomic(&path, &sample()).unwrap();
        let loaded: Ledger = read_json(&path).unwrap();
        assert_eq!(loaded, sample());
        assert!(!temp_dir.path().join("ledger.json.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("nested").join("ledger.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        fs::write(&path, "not json at all").unwrap();

        assert!(matches!(
            read_json::<Ledger, _>(&path),
            Err(MonetaError::Storage(_))
        ));
    }
}
