// key -> column mapping
use tracing::warn;

use crate::core::error::ColumnError;
use crate::core::expr::is_identifier;
use crate::core::registry::{KeyColumnMap, MappingRegistry, Version};

impl MappingRegistry {
    //store a mapping from client key to database column for one (version, table)
    //1. each key maps to at most one column; remapping needs the explicit overwrite call.
    //2. several keys may share a column, the inverse then keeps only one of them.
    //3. every mutation re-derives the column -> key table of that (version, table).

    fn warn_if_shared_column(&self, version: Version, table: &str, key: &str, column: &str) {
        if let Some(keys) = self.key_column_map(version, table) {
            if let Some((other, _)) = keys.iter().find(|(k, c)| k.as_str() != key && c.as_str() == column) {
                warn!(?version, table, key, other_key = %other, column, "column already mapped by another key, output keys become ambiguous");
            }
        }
    }

    pub fn set_key_column(&mut self, version: Version, table: &str, key: &str, column: &str) -> Result<(), ColumnError> {
        match self.column_for_key(version, table, key) {
            None => {
                self.set_key_column_overwrite(version, table, key, column);
                Ok(())
            }
            Some(old) if old == column => Ok(()), //identical mapping is a no-op
            Some(old) => Err(ColumnError::MappingAlreadyExists {
                version,
                table: table.to_string(),
                key: key.to_string(),
                old_column: old.to_string(),
                new_column: column.to_string(),
            }),
        }
    }

    pub fn set_key_column_overwrite(&mut self, version: Version, table: &str, key: &str, column: &str) -> Option<String> {
        self.warn_if_shared_column(version, table, key, column);

        let old = self
            .key_columns
            .entry(version)
            .or_default()
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), column.to_string());

        self.rebuild_table(version, table);
        old
    }

    /// Replaces every key mapping of `table` at once.
    pub fn set_table_key_columns<I, K, C>(&mut self, version: Version, table: &str, pairs: I) -> Option<KeyColumnMap>
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<String>,
    {
        let keys: KeyColumnMap = pairs.into_iter().map(|(k, c)| (k.into(), c.into())).collect();
        let old = self
            .key_columns
            .entry(version)
            .or_default()
            .insert(table.to_string(), keys);

        self.rebuild_table(version, table);
        old
    }

    pub fn remove_key_column(&mut self, version: Version, table: &str, key: &str) -> Option<String> {
        let removed = self
            .key_columns
            .get_mut(&version)
            .and_then(|tables| tables.get_mut(table))
            .and_then(|keys| keys.remove(key));

        if removed.is_some() {
            self.rebuild_table(version, table);
        }
        removed
    }

    pub fn clear_key_columns(&mut self) {
        self.key_columns.clear();
        self.column_keys.clear();
    }

    pub fn key_column_len(&self) -> usize {
        self.key_columns
            .values()
            .flat_map(|tables| tables.values())
            .map(KeyColumnMap::len)
            .sum()
    }

    //for reports: (version, table, key, column)
    pub fn iter_key_columns(&self) -> impl Iterator<Item = (Version, &str, &str, &str)> + '_ {
        self.key_columns.iter().flat_map(|(&version, tables)| {
            tables.iter().flat_map(move |(table, keys)| {
                keys.iter()
                    .map(move |(key, column)| (version, table.as_str(), key.as_str(), column.as_str()))
            })
        })
    }

    /// Checks that every registered key and column is a plain identifier.
    pub fn validate_key_columns(&self) -> Result<(), ColumnError> {
        for (_, _, key, column) in self.iter_key_columns() {
            for name in [key, column] {
                if !is_identifier(name) {
                    return Err(ColumnError::InvalidIdentifier { name: name.to_string() });
                }
            }
        }
        Ok(())
    }
}
