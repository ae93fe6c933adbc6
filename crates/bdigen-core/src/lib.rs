//! Core contracts for bdigen.
//!
//! This crate defines the mapping description that ties Salesforce objects to
//! local tables, the validation and binding steps that turn it into table
//! handles, and helpers shared by the factory engine and the CLI.

pub mod binding;
pub mod error;
pub mod mapping;
pub mod redaction;
pub mod validation;

pub use binding::{BoundSchema, TableHandle, bind};
pub use error::{Error, Result};
pub use mapping::{FieldMapping, LookupMapping, Mapping, MappingStep, load_mapping, parse_mapping};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use validation::validate_mapping;

/// Name of the primary key column every bound table carries.
pub const ID_COLUMN: &str = "id";
