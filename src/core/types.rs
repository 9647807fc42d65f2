// shared identifiers
use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema-mapping generation chosen by the embedding application.
///
/// Lookups take an `Option<VersionId>`; `None` selects the default mapping set.
pub type VersionId = i32;

/// Delimiter of the one-way composite table key.
pub const TABLE_KEY_DELIMITER: char = '-';

/// Request verb of the ORM layer. Resolvers accept it but never branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Head,
    Gets,
    Heads,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn is_query(self) -> bool {
        matches!(self, RequestMethod::Get | RequestMethod::Head | RequestMethod::Gets | RequestMethod::Heads)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Head => "HEAD",
            RequestMethod::Gets => "GETS",
            RequestMethod::Heads => "HEADS",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table qualified by database, schema and datasource.
///
/// The registry only knows opaque table strings, so a qualified table is flattened
/// with [`QualifiedTable::to_key`]. The encoding is one-way: nothing splits it again,
/// and a component containing the delimiter can collide with another table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedTable {
    pub database: String,
    pub schema: String,
    pub datasource: String,
    pub table: String,
}

impl QualifiedTable {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        datasource: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            datasource: datasource.into(),
            table: table.into(),
        }
    }

    pub fn to_key(&self) -> String {
        concat_table_key(&self.database, &self.schema, &self.datasource, &self.table)
    }
}

impl fmt::Display for QualifiedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

//database-schema-datasource-table
pub fn concat_table_key(database: &str, schema: &str, datasource: &str, table: &str) -> String {
    let d = TABLE_KEY_DELIMITER;
    format!("{database}{d}{schema}{d}{datasource}{d}{table}")
}
