//! Record-factory composition engine for bdigen.
//!
//! Builds graphs of related CRM records (accounts, contacts, opportunities,
//! payments and data import staging rows) against a bound mapping, keeping
//! naming and dates consistent across cohorts through shared counters.

pub mod adder;
pub mod attribute;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod factories;
pub mod model;
pub mod output;
pub mod records;
pub mod sql;
pub mod store;
pub mod value;

pub use adder::{Adder, Sequence};
pub use attribute::Attribute;
pub use driver::DataFactory;
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::FactoryError;
pub use factories::Factories;
pub use model::{CohortReport, GenerateOptions, GenerationReport, TableReport};
pub use sql::SqlStore;
pub use store::{MemoryStore, RecordSink};
