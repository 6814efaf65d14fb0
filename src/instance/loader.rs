//! Loads instance metadata from disk
//!
//! Layout under the metadata directory:
//! - `tables/*.json`: one `TableMetaData` per file
//! - `security_key_types/*.json`: one `SecurityKeyType` per file
//!
//! Missing subdirectories mean "none of that kind". Non-JSON files are
//! skipped. Files are read in path order so errors are reproducible. The
//! loaded instance is validated before it is returned.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{InstanceError, InstanceResult};
use super::table::TableMetaData;
use super::Instance;
use crate::observability::{log_event_with_fields, Event};
use crate::security::SecurityKeyType;

pub struct InstanceLoader {
    metadata_dir: PathBuf,
}

impl InstanceLoader {
    pub fn new(metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
        }
    }

    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.metadata_dir.join("tables")
    }

    pub fn security_key_types_dir(&self) -> PathBuf {
        self.metadata_dir.join("security_key_types")
    }

    /// Reads and validates the whole instance
    pub fn load(&self) -> InstanceResult<Instance> {
        let mut instance = Instance::new();

        for key_type in Self::read_all::<SecurityKeyType>(&self.security_key_types_dir())? {
            instance.add_security_key_type(key_type);
        }

        for table in Self::read_all::<TableMetaData>(&self.tables_dir())? {
            instance.add_table(table)?;
        }

        let metadata_dir = self.metadata_dir.display().to_string();
        if let Err(err) = instance.validate() {
            let message = err.to_string();
            log_event_with_fields(
                Event::MetadataInvalid,
                &[
                    ("code", err.code()),
                    ("error", message.as_str()),
                    ("metadata_dir", metadata_dir.as_str()),
                ],
            );
            return Err(err);
        }

        let table_count = instance.tables().count().to_string();
        let key_type_count = instance.security_key_types().count().to_string();
        log_event_with_fields(
            Event::MetadataLoaded,
            &[
                ("metadata_dir", metadata_dir.as_str()),
                ("security_key_types", key_type_count.as_str()),
                ("tables", table_count.as_str()),
            ],
        );

        Ok(instance)
    }

    /// Writes a table file, for tooling and tests
    pub fn save_table(&self, table: &TableMetaData) -> InstanceResult<PathBuf> {
        Self::write_json(&self.tables_dir(), &table.name, table)
    }

    /// Writes a key type file, for tooling and tests
    pub fn save_security_key_type(&self, key_type: &SecurityKeyType) -> InstanceResult<PathBuf> {
        Self::write_json(&self.security_key_types_dir(), &key_type.name, key_type)
    }

    fn read_all<T: DeserializeOwned>(dir: &Path) -> InstanceResult<Vec<T>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            InstanceError::malformed_metadata(
                dir.display().to_string(),
                format!("Failed to read directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                InstanceError::malformed_metadata(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| Self::read_file(path)).collect()
    }

    fn read_file<T: DeserializeOwned>(path: &Path) -> InstanceResult<T> {
        let content = fs::read_to_string(path).map_err(|e| {
            InstanceError::malformed_metadata(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            InstanceError::malformed_metadata(path.display().to_string(), format!("Invalid JSON: {}", e))
        })
    }

    fn write_json<T: serde::Serialize>(dir: &Path, name: &str, item: &T) -> InstanceResult<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| {
            InstanceError::malformed_metadata(
                dir.display().to_string(),
                format!("Failed to create directory: {}", e),
            )
        })?;

        let path = dir.join(format!("{}.json", name));
        let content = serde_json::to_string_pretty(item).map_err(|e| {
            InstanceError::malformed_metadata(path.display().to_string(), format!("Failed to serialize: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            InstanceError::malformed_metadata(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::RecordSecurityLock;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_empty_instance() {
        let temp = TempDir::new().unwrap();
        let instance = InstanceLoader::new(temp.path().join("nothing")).load().unwrap();
        assert_eq!(instance.tables().count(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let loader = InstanceLoader::new(temp.path());

        loader.save_security_key_type(&SecurityKeyType::new("clientId")).unwrap();
        loader
            .save_table(
                &TableMetaData::new("order")
                    .with_record_security_lock(RecordSecurityLock::new("clientId", "clientId")),
            )
            .unwrap();

        let instance = loader.load().unwrap();
        assert_eq!(instance.table("order").unwrap().record_security_locks.len(), 1);
    }

    #[test]
    fn test_non_json_files_skipped() {
        let temp = TempDir::new().unwrap();
        let loader = InstanceLoader::new(temp.path());
        fs::create_dir_all(loader.tables_dir()).unwrap();
        fs::write(loader.tables_dir().join("README.txt"), "not metadata").unwrap();

        assert_eq!(loader.load().unwrap().tables().count(), 0);
    }

    #[test]
    fn test_invalid_json_names_file() {
        let temp = TempDir::new().unwrap();
        let loader = InstanceLoader::new(temp.path());
        fs::create_dir_all(loader.tables_dir()).unwrap();
        fs::write(loader.tables_dir().join("broken.json"), "{ nope").unwrap();

        match loader.load().unwrap_err() {
            InstanceError::MalformedMetadata { path, reason } => {
                assert!(path.ends_with("broken.json"));
                assert!(reason.starts_with("Invalid JSON"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
