use std::collections::BTreeMap;

use crate::errors::FactoryError;
use crate::records::Record;
use crate::value::Row;

/// Destination for built records.
///
/// Factories insert each record as soon as it is built, parents before the
/// records that reference them.
pub trait RecordSink {
    fn insert(&mut self, table: &str, row: Row) -> Result<(), FactoryError>;
}

/// Insert a typed record into its own table.
pub fn persist<R: Record>(sink: &mut dyn RecordSink, record: &R) -> Result<(), FactoryError> {
    sink.insert(R::TABLE, record.to_row())
}

/// In-memory rows per table, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }
}

impl RecordSink for MemoryStore {
    fn insert(&mut self, table: &str, row: Row) -> Result<(), FactoryError> {
        self.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }
}
