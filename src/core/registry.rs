// the versioned lookup tables
use std::collections::{BTreeMap, HashMap};

use crate::core::types::VersionId;

pub type Version = Option<VersionId>;

/// key -> column for one table. Ordered so inversion is deterministic.
pub type KeyColumnMap = BTreeMap<String, String>;
/// column -> key for one table.
pub type ColumnKeyMap = HashMap<String, String>;

/// Versioned key/column tables of every known table.
///
/// Populate it during startup, then share it by reference with the query builder and
/// the result serializer. Mutators take `&mut self`, so the borrow checker keeps
/// writers and readers apart; no locking is done here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingRegistry {
    /// version -> table -> all columns, in declaration order (reverse selection)
    pub(crate) table_columns: HashMap<Version, HashMap<String, Vec<String>>>,
    /// version -> table -> key -> column
    pub(crate) key_columns: HashMap<Version, HashMap<String, KeyColumnMap>>,
    /// version -> table -> column -> key, derived from `key_columns`
    pub(crate) column_keys: HashMap<Version, HashMap<String, ColumnKeyMap>>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the full column list of `table`, returning the previous one.
    pub fn set_table_columns<I, S>(&mut self, version: Version, table: &str, columns: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.table_columns
            .entry(version)
            .or_default()
            .insert(table.to_string(), columns)
    }

    pub fn table_columns(&self, version: Version, table: &str) -> Option<&[String]> {
        self.table_columns
            .get(&version)
            .and_then(|tables| tables.get(table))
            .map(Vec::as_slice)
    }

    pub(crate) fn key_column_map(&self, version: Version, table: &str) -> Option<&KeyColumnMap> {
        self.key_columns.get(&version).and_then(|tables| tables.get(table))
    }

    pub(crate) fn column_key_map(&self, version: Version, table: &str) -> Option<&ColumnKeyMap> {
        self.column_keys.get(&version).and_then(|tables| tables.get(table))
    }

    pub fn column_for_key(&self, version: Version, table: &str, key: &str) -> Option<&str> {
        self.key_column_map(version, table)
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    pub fn key_for_column(&self, version: Version, table: &str, column: &str) -> Option<&str> {
        self.column_key_map(version, table)
            .and_then(|m| m.get(column))
            .map(String::as_str)
    }

    /// Versions that have columns or key mappings registered.
    pub fn versions(&self) -> Vec<Version> {
        let mut out: Vec<Version> = self
            .table_columns
            .keys()
            .chain(self.key_columns.keys())
            .copied()
            .collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn is_empty(&self) -> bool {
        self.table_columns.values().all(HashMap::is_empty) && self.key_columns.values().all(HashMap::is_empty)
    }
}
