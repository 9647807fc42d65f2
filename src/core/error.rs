use thiserror::Error;

use crate::core::types::VersionId;

#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("exclusion `{expression}` has an empty column name")]
    EmptyExclusion { expression: String },

    #[error("exclusion column `{name}` is not a valid identifier")]
    InvalidExclusion { name: String },

    #[error("`{name}` is not a valid identifier")]
    InvalidIdentifier { name: String },

    #[error("key `{key}` of table `{table}` (version {version:?}) already maps to `{old_column}`, refusing `{new_column}`")]
    MappingAlreadyExists {
        version: Option<VersionId>,
        table: String,
        key: String,
        old_column: String,
        new_column: String,
    },

    #[error("mapping document error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ColumnError {
    /// Malformed caller input, to be surfaced as a client error of the request.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ColumnError::EmptyExclusion { .. } | ColumnError::InvalidExclusion { .. })
    }
}

pub type Result<T> = std::result::Result<T, ColumnError>;
