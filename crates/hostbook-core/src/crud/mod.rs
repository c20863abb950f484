//! Profile CRUD: field collection, create/edit/delete and cascade cleanup

pub mod cascade;
pub mod collect;
mod ops;

pub use cascade::{purge_references, CascadeReport, CascadeStep, DeleteReport};
pub use collect::{parse_host, FieldCollector};
pub use ops::ProfileCrud;
