//! Field-name indirection for JSON-driven ORM requests.
//!
//! A [`MappingRegistry`] holds, per schema version and table, the full column list of
//! the table and the mapping from client-facing keys to database columns. The
//! resolver methods on the registry translate request keys into columns (with `!key`
//! reverse selection) and result columns back into keys.

pub mod core;
pub mod mapping;

pub use crate::core::error::{ColumnError, Result};
pub use crate::core::expr::ColumnSyntax;
pub use crate::core::registry::MappingRegistry;
pub use crate::core::resolve::Resolver;
pub use crate::core::types::{concat_table_key, QualifiedTable, RequestMethod, VersionId};
pub use crate::mapping::generator::{load_registry_file, load_registry_str, KeyMapping, MappingDocument, TableMapping};
