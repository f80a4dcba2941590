// qualis-core/src/infrastructure/records.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::domain::record::Record;
use crate::infrastructure::error::InfrastructureError;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Reads one record file (`number`, `title`, `values: [{criterion, value}]`).
pub fn load_record_file(path: &Path) -> Result<Record, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    let record: Record = serde_yaml::from_str(&content)?;
    if record.number.trim().is_empty() {
        return Err(InfrastructureError::ConfigError(format!(
            "Record file {:?} has no number",
            path
        )));
    }
    Ok(record)
}

/// A file is returned as is; a directory is walked for YAML files, sorted by path.
pub fn discover_record_files(path: &Path) -> Result<Vec<PathBuf>, InfrastructureError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(InfrastructureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Record path {:?} does not exist", path),
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.map_err(|e| InfrastructureError::Io(std::io::Error::other(e)))?;
        let is_record = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
        if is_record {
            files.push(entry.into_path());
        }
    }
    files.sort();
    debug!(count = files.len(), root = ?path, "Record files discovered");
    Ok(files)
}
