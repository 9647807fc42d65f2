// request/response key compatibility
use std::collections::HashSet;

use tracing::{debug, trace};

use crate::core::error::ColumnError;
use crate::core::expr::{ColumnSyntax, SubKey};
use crate::core::registry::{MappingRegistry, Version};
use crate::core::types::RequestMethod;

impl MappingRegistry {
    /// Translates the column selection of a request into database columns.
    ///
    /// Each element may hold several sub-keys joined by `syntax.separator`:
    /// - `fn(args)` is kept verbatim,
    /// - `key` becomes its mapped column (or stays `key` when unmapped),
    /// - `!key` excludes the mapped column; once any exclusion is present, every column
    ///   registered for the table that was not excluded is appended in stored order.
    ///
    /// `None` and an empty list pass through unchanged. Duplicates are kept.
    pub fn resolve_input_columns_with(
        &self,
        columns: Option<&[String]>,
        table: &str,
        method: RequestMethod,
        version: Version,
        syntax: &ColumnSyntax,
    ) -> Result<Option<Vec<String>>, ColumnError> {
        let columns = match columns {
            Some(c) if !c.is_empty() => c,
            other => return Ok(other.map(<[String]>::to_vec)),
        };
        trace!(table, %method, ?version, count = columns.len(), "resolving input columns");

        let keys = self.key_column_map(version, table);
        let lookup = |key: &str| -> String {
            keys.and_then(|m| m.get(key)).cloned().unwrap_or_else(|| key.to_string())
        };

        let mut resolved = Vec::with_capacity(columns.len());
        let mut excluded: HashSet<String> = HashSet::new();

        for element in columns {
            for sub_key in syntax.split(element) {
                match syntax.classify(sub_key)? {
                    SubKey::Function(expr) => resolved.push(expr.to_string()),
                    SubKey::Exclude(name) => {
                        excluded.insert(lookup(name));
                    }
                    SubKey::Plain(key) => resolved.push(lookup(key)),
                }
            }
        }

        if !excluded.is_empty() {
            match self.table_columns(version, table) {
                Some(all) => resolved.extend(all.iter().filter(|c| !excluded.contains(c.as_str())).cloned()),
                None => debug!(table, ?version, "exclusions given but no column list registered, ignoring them"),
            }
        }

        Ok(Some(resolved))
    }

    /// [`resolve_input_columns_with`](Self::resolve_input_columns_with) using the default
    /// `;` separator.
    pub fn resolve_input_columns(
        &self,
        columns: Option<&[String]>,
        table: &str,
        method: RequestMethod,
        version: Version,
    ) -> Result<Option<Vec<String>>, ColumnError> {
        self.resolve_input_columns_with(columns, table, method, version, &ColumnSyntax::default())
    }

    /// Maps a condition or assignment key to its column. Unmapped keys pass through.
    pub fn resolve_input_key(&self, key: &str, table: &str, method: RequestMethod, version: Version) -> String {
        trace!(key, table, %method, ?version, "resolving input key");
        self.column_for_key(version, table, key).unwrap_or(key).to_string()
    }

    /// Maps a result column back to the client key, so real column names never leak
    /// even when the request selected no columns explicitly. Unmapped columns pass
    /// through.
    pub fn resolve_output_key(&self, key: &str, table: &str, method: RequestMethod, version: Version) -> String {
        trace!(key, table, %method, ?version, "resolving output key");
        self.key_for_column(version, table, key).unwrap_or(key).to_string()
    }

    pub fn resolver<'a>(&'a self, table: &'a str, method: RequestMethod, version: Version) -> Resolver<'a> {
        Resolver {
            registry: self,
            table,
            method,
            version,
            syntax: ColumnSyntax::default(),
        }
    }
}

/// Registry view bound to one table, method and version.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a MappingRegistry,
    table: &'a str,
    method: RequestMethod,
    version: Version,
    syntax: ColumnSyntax,
}

impl<'a> Resolver<'a> {
    pub fn with_syntax(mut self, syntax: ColumnSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn input_columns(&self, columns: Option<&[String]>) -> Result<Option<Vec<String>>, ColumnError> {
        self.registry
            .resolve_input_columns_with(columns, self.table, self.method, self.version, &self.syntax)
    }

    pub fn input_key(&self, key: &str) -> String {
        self.registry.resolve_input_key(key, self.table, self.method, self.version)
    }

    pub fn output_key(&self, key: &str) -> String {
        self.registry.resolve_output_key(key, self.table, self.method, self.version)
    }
}
