pub mod error;
pub mod expr;
pub mod inverse;
pub mod mapping;
pub mod registry;
pub mod resolve;
pub mod types;
