use serde::Serialize;

use crate::ID_COLUMN;
use crate::error::{Error, Result};
use crate::mapping::Mapping;
use crate::validation::validate_mapping;

/// Column layout of one mapped table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableHandle {
    pub step: String,
    pub sf_object: String,
    pub table: String,
    /// Bound columns; the first entry is always `id`.
    pub columns: Vec<String>,
}

impl TableHandle {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|candidate| candidate == column)
    }
}

/// Queryable handle over every table a mapping declares, in load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundSchema {
    pub tables: Vec<TableHandle>,
}

impl BoundSchema {
    pub fn table(&self, name: &str) -> Option<&TableHandle> {
        self.tables.iter().find(|handle| handle.table == name)
    }

    /// Look up a table and check that it carries every listed column.
    pub fn require(&self, name: &str, columns: &[&str]) -> Result<&TableHandle> {
        let handle = self
            .table(name)
            .ok_or_else(|| Error::MissingTable(name.to_string()))?;
        for column in columns {
            if !handle.has_column(column) {
                return Err(Error::MissingColumn {
                    table: name.to_string(),
                    column: (*column).to_string(),
                });
            }
        }
        Ok(handle)
    }
}

/// Validate a mapping and derive the table handles it describes.
pub fn bind(mapping: &Mapping) -> Result<BoundSchema> {
    validate_mapping(mapping)?;

    let tables = mapping
        .steps
        .iter()
        .map(|step| TableHandle {
            step: step.name.clone(),
            sf_object: step.sf_object.clone(),
            table: step.table.clone(),
            columns: std::iter::once(ID_COLUMN)
                .chain(step.columns())
                .map(str::to_string)
                .collect(),
        })
        .collect();

    Ok(BoundSchema { tables })
}
