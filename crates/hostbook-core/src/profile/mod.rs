//! Profile types, schemas and the in-memory registry

pub mod registry;
pub mod schema;
mod types;

pub use registry::{ProfileRegistry, RefreshReport};
pub use schema::{FieldSchema, FieldType, ProfileSchema, SchemaType, TypeCatalog, BASE_TYPE};
pub use types::*;
