//! Instance metadata
//!
//! An instance is the registry of tables and security key types that
//! queries and writes are checked against. It is built programmatically or
//! loaded from a metadata directory, then validated once.

mod errors;
mod loader;
mod table;

pub use errors::{InstanceError, InstanceResult};
pub use loader::InstanceLoader;
pub use table::TableMetaData;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::security::{Lock, SecurityError, SecurityKeyType, SecurityKeyTypeLookup};

/// Tables and security key types, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default)]
    tables: BTreeMap<String, TableMetaData>,
    #[serde(default)]
    security_key_types: BTreeMap<String, SecurityKeyType>,
}

impl Instance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: TableMetaData) -> InstanceResult<()> {
        if self.tables.contains_key(&table.name) {
            return Err(InstanceError::DuplicateTable(table.name));
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Registers a key type, replacing any with the same name
    pub fn add_security_key_type(&mut self, key_type: SecurityKeyType) {
        self.security_key_types.insert(key_type.name.clone(), key_type);
    }

    pub fn with_table(mut self, table: TableMetaData) -> InstanceResult<Self> {
        self.add_table(table)?;
        Ok(self)
    }

    pub fn with_security_key_type(mut self, key_type: SecurityKeyType) -> Self {
        self.add_security_key_type(key_type);
        self
    }

    pub fn table(&self, name: &str) -> InstanceResult<&TableMetaData> {
        self.tables
            .get(name)
            .ok_or_else(|| InstanceError::UnknownTable(name.to_string()))
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableMetaData> {
        self.tables.values()
    }

    pub fn security_key_types(&self) -> impl Iterator<Item = &SecurityKeyType> {
        self.security_key_types.values()
    }

    /// Checks every table's locks against the registered key types.
    ///
    /// Record locks need a registered key type and a non-empty field name;
    /// field locks need a registered key type.
    pub fn validate(&self) -> InstanceResult<()> {
        for table in self.tables.values() {
            if table.primary_key_field.is_empty() {
                return Err(InstanceError::malformed_metadata(
                    &table.name,
                    "primary key field is empty",
                ));
            }

            for lock in &table.record_security_locks {
                self.validate_lock(&table.name, lock)?;
            }

            for (field_name, lock) in &table.field_security_locks {
                if !self.security_key_types.contains_key(&lock.security_key_type) {
                    return Err(SecurityError::UnknownSecurityKeyType(format!(
                        "{} (field lock {}.{})",
                        lock.security_key_type, table.name, field_name
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    fn validate_lock(&self, table_name: &str, lock: &Lock) -> InstanceResult<()> {
        match lock {
            Lock::Leaf(leaf) => {
                if leaf.field_name.is_empty() {
                    return Err(SecurityError::InvalidLock(format!(
                        "lock on table {} for key type {} has no field name",
                        table_name, leaf.security_key_type
                    ))
                    .into());
                }
                if !self.security_key_types.contains_key(&leaf.security_key_type) {
                    return Err(SecurityError::UnknownSecurityKeyType(leaf.security_key_type.clone()).into());
                }
                Ok(())
            }
            Lock::Multi(multi) => multi
                .locks
                .iter()
                .try_for_each(|child| self.validate_lock(table_name, child)),
        }
    }
}

impl SecurityKeyTypeLookup for Instance {
    fn security_key_type(&self, name: &str) -> Option<&SecurityKeyType> {
        self.security_key_types.get(name)
    }
}
