use std::collections::{BTreeMap, BTreeSet};

use crate::ID_COLUMN;
use crate::error::{Error, Result};
use crate::mapping::Mapping;

/// Validate internal consistency of a mapping.
///
/// This checks:
/// - duplicate tables across steps
/// - duplicate columns within a table, including clashes with `id`
/// - lookups referencing tables no step declares
pub fn validate_mapping(mapping: &Mapping) -> Result<()> {
    if mapping.steps.is_empty() {
        return Err(Error::InvalidMapping("mapping declares no steps".to_string()));
    }

    let mut tables: BTreeMap<&str, &str> = BTreeMap::new();
    for step in &mapping.steps {
        if step.table.is_empty() {
            return Err(Error::InvalidMapping(format!(
                "step '{}' has an empty table name",
                step.name
            )));
        }
        if let Some(previous) = tables.insert(step.table.as_str(), step.name.as_str()) {
            return Err(Error::InvalidMapping(format!(
                "table '{}' is declared by both '{}' and '{}'",
                step.table, previous, step.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in step.columns() {
            if column.eq_ignore_ascii_case(ID_COLUMN) {
                return Err(Error::InvalidMapping(format!(
                    "column '{}.{column}' clashes with the implicit key",
                    step.table
                )));
            }
            if !columns.insert(column) {
                return Err(Error::InvalidMapping(format!(
                    "duplicate column: {}.{column}",
                    step.table
                )));
            }
        }
    }

    for step in &mapping.steps {
        for lookup in &step.lookups {
            if !tables.contains_key(lookup.table.as_str()) {
                return Err(Error::InvalidMapping(format!(
                    "lookup '{}.{}' references undeclared table '{}'",
                    step.table, lookup.field, lookup.table
                )));
            }
        }
    }

    Ok(())
}
