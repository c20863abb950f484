//! hostbook Core - Profile registry, validation cache and storage
//!
//! This crate provides the connection profile registry, the per-profile
//! validation state machine, schema-driven field collection, CRUD
//! orchestration with cascading cleanup, and SQLite storage.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod consumer;
pub mod crud;
pub mod error;
pub mod profile;
pub mod storage;
pub mod ui;
pub mod validation;

pub use error::{ProfileError, ProfileResult};
pub use profile::{Profile, ProfileRegistry, ProfileSchema, TypeCatalog};
pub use validation::{DisplayTag, ProfileValidator, ValidationResult, ValidationStatus};
