// column -> key derivation
use std::collections::HashMap;

use tracing::debug;

use crate::core::registry::{ColumnKeyMap, KeyColumnMap, MappingRegistry, Version};

/// Inverts one table's key -> column map.
///
/// Keys are visited in ascending order and later keys overwrite earlier ones, so a
/// column claimed by several keys ends up with the greatest key.
pub fn invert(key_columns: &KeyColumnMap) -> ColumnKeyMap {
    key_columns
        .iter()
        .map(|(key, column)| (column.clone(), key.clone()))
        .collect()
}

impl MappingRegistry {
    //Recompute the whole column -> key table from the key -> column table:
    // - drops every derived entry
    // - inverts each (version, table) that has at least one key
    pub fn rebuild(&mut self) {
        self.column_keys.clear();

        let mut tables = 0usize;
        for (&version, by_table) in &self.key_columns {
            let inverted: HashMap<String, ColumnKeyMap> = by_table
                .iter()
                .filter(|(_, keys)| !keys.is_empty())
                .map(|(table, keys)| (table.clone(), invert(keys)))
                .collect();

            if !inverted.is_empty() {
                tables += inverted.len();
                self.column_keys.insert(version, inverted);
            }
        }

        debug!(tables, "rebuilt column -> key mapping");
    }

    //Re-derive a single table after its key -> column map changed.
    pub(crate) fn rebuild_table(&mut self, version: Version, table: &str) {
        let inverted = self
            .key_column_map(version, table)
            .filter(|keys| !keys.is_empty())
            .map(invert);

        match inverted {
            Some(m) => {
                self.column_keys.entry(version).or_default().insert(table.to_string(), m);
            }
            None => {
                if let Some(by_table) = self.column_keys.get_mut(&version) {
                    by_table.remove(table);
                    if by_table.is_empty() {
                        self.column_keys.remove(&version);
                    }
                }
            }
        }
    }

    pub fn column_key_len(&self) -> usize {
        self.column_keys
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }
}
