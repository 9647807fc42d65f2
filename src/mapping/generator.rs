/*
Input:

    a mapping document (TOON), one entry per (version, table):

        tables[1]:
          - table: User
            version: 1
            columns[3]: id,name,pwd
            keys[2]{key,column}:
              userName,name
              password,pwd

Output:

    MappingRegistry with table columns, key -> column and the derived column -> key

Responsibilities:

    Reject keys and columns that are not plain identifiers

    Reject a key mapped to two different columns of one table

    Produce the same registry for the same document
*/
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::ColumnError;
use crate::core::expr::is_identifier;
use crate::core::registry::MappingRegistry;
use crate::core::types::VersionId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(default)]
    pub tables: Vec<TableMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMapping {
    pub table: String,
    #[serde(default)]
    pub version: Option<VersionId>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub keys: Vec<KeyMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMapping {
    pub key: String,
    pub column: String,
}

fn expect_identifier(name: &str) -> Result<(), ColumnError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ColumnError::InvalidIdentifier { name: name.to_string() })
    }
}

impl MappingDocument {
    pub fn from_toon(input: &str) -> Result<Self, ColumnError> {
        toon_format::decode_default(input).map_err(|e| ColumnError::Config(e.to_string()))
    }

    pub fn to_toon(&self) -> Result<String, ColumnError> {
        toon_format::encode_default(self).map_err(|e| ColumnError::Config(e.to_string()))
    }
}

impl MappingRegistry {
    pub fn from_document(doc: &MappingDocument) -> Result<Self, ColumnError> {
        let mut registry = MappingRegistry::new();

        for t in &doc.tables {
            if !t.columns.is_empty() {
                for c in &t.columns {
                    expect_identifier(c)?;
                }
                registry.set_table_columns(t.version, &t.table, t.columns.iter().cloned());
            }

            for k in &t.keys {
                expect_identifier(&k.key)?;
                expect_identifier(&k.column)?;
                registry.set_key_column(t.version, &t.table, &k.key, &k.column)?;
            }
        }

        info!(tables = doc.tables.len(), keys = registry.key_column_len(), "loaded column mapping document");
        Ok(registry)
    }

    /// Exports the registry as a document, sorted by version then table.
    pub fn to_document(&self) -> MappingDocument {
        let mut entries: Vec<(Option<VersionId>, &str)> = self
            .table_columns
            .iter()
            .flat_map(|(&v, tables)| tables.keys().map(move |t| (v, t.as_str())))
            .chain(
                self.key_columns
                    .iter()
                    .flat_map(|(&v, tables)| tables.keys().map(move |t| (v, t.as_str()))),
            )
            .collect();
        entries.sort();
        entries.dedup();

        let tables = entries
            .into_iter()
            .map(|(version, table)| TableMapping {
                table: table.to_string(),
                version,
                columns: self.table_columns(version, table).map(<[String]>::to_vec).unwrap_or_default(),
                keys: self
                    .key_column_map(version, table)
                    .map(|m| {
                        m.iter()
                            .map(|(key, column)| KeyMapping { key: key.clone(), column: column.clone() })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        MappingDocument { tables }
    }
}

pub fn load_registry_str(input: &str) -> Result<MappingRegistry, ColumnError> {
    let doc = MappingDocument::from_toon(input)?;
    MappingRegistry::from_document(&doc)
}

pub fn load_registry_file(path: impl AsRef<Path>) -> Result<MappingRegistry, ColumnError> {
    let input = fs::read_to_string(path)?;
    load_registry_str(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RequestMethod;

    fn mk_table(table: &str, version: Option<VersionId>, columns: &[&str], keys: &[(&str, &str)]) -> TableMapping {
        TableMapping {
            table: table.to_string(),
            version,
            columns: columns.iter().map(|s| s.to_string()).collect(),
            keys: keys
                .iter()
                .map(|(k, c)| KeyMapping { key: k.to_string(), column: c.to_string() })
                .collect(),
        }
    }

    #[test]
    fn document_populates_columns_and_both_directions() {
        let doc = MappingDocument {
            tables: vec![
                mk_table("User", Some(1), &["id", "name", "pwd"], &[("userName", "name"), ("password", "pwd")]),
                mk_table("Moment", None, &[], &[("text", "content")]),
            ],
        };

        let r = MappingRegistry::from_document(&doc).unwrap();

        assert_eq!(r.table_columns(Some(1), "User").unwrap(), ["id", "name", "pwd"]);
        assert_eq!(r.table_columns(None, "Moment"), None);
        assert_eq!(r.resolve_input_key("userName", "User", RequestMethod::Get, Some(1)), "name");
        assert_eq!(r.resolve_output_key("content", "Moment", RequestMethod::Get, None), "text");
    }

    #[test]
    fn document_rejects_bad_identifiers() {
        let doc = MappingDocument { tables: vec![mk_table("User", None, &["id", "1st"], &[])] };
        let err = MappingRegistry::from_document(&doc).unwrap_err();
        assert!(matches!(err, ColumnError::InvalidIdentifier { ref name } if name == "1st"));

        let doc = MappingDocument { tables: vec![mk_table("User", None, &[], &[("user name", "name")])] };
        assert!(matches!(MappingRegistry::from_document(&doc), Err(ColumnError::InvalidIdentifier { .. })));
    }

    #[test]
    fn document_rejects_conflicting_keys() {
        let doc = MappingDocument {
            tables: vec![
                mk_table("User", Some(1), &[], &[("userName", "name")]),
                mk_table("User", Some(1), &[], &[("userName", "nickname")]),
            ],
        };
        let err = MappingRegistry::from_document(&doc).unwrap_err();
        assert!(matches!(err, ColumnError::MappingAlreadyExists { .. }));
    }

    #[test]
    fn registry_exports_sorted_document() {
        let mut r = MappingRegistry::new();
        r.set_table_columns(Some(2), "User", ["id", "name"]);
        r.set_key_column(Some(2), "User", "userName", "name").unwrap();
        r.set_key_column(None, "Moment", "text", "content").unwrap();

        let doc = r.to_document();
        assert_eq!(
            doc.tables,
            vec![
                mk_table("Moment", None, &[], &[("text", "content")]),
                mk_table("User", Some(2), &["id", "name"], &[("userName", "name")]),
            ]
        );
        assert_eq!(MappingRegistry::from_document(&doc).unwrap(), r);
    }

    #[test]
    fn toon_text_loads_into_registry() {
        let doc = MappingDocument {
            tables: vec![mk_table("User", Some(1), &["id", "name", "pwd"], &[("userName", "name")])],
        };
        let text = doc.to_toon().unwrap();

        let r = load_registry_str(&text).unwrap();
        assert_eq!(r.to_document(), doc);

        let input = vec!["!userName".to_string()];
        let out = r.resolve_input_columns(Some(input.as_slice()), "User", RequestMethod::Get, Some(1)).unwrap();
        assert_eq!(out.unwrap(), vec!["id".to_string(), "pwd".to_string()]);
    }

    #[test]
    fn malformed_toon_is_a_config_error() {
        let err = load_registry_str("tables: 5\n").unwrap_err();
        assert!(matches!(err, ColumnError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_registry_file("/nonexistent/column-mapping.toon").unwrap_err();
        assert!(matches!(err, ColumnError::Io(_)));
    }
}
