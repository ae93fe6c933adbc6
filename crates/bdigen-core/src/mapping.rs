use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{Error, Result};

/// Ordered mapping description, one step per Salesforce object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub steps: Vec<MappingStep>,
}

/// One `<step name>: {...}` entry of a mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingStep {
    /// Step label as written in the file (e.g. `Insert Accounts`).
    pub name: String,
    /// Salesforce API name of the object loaded by this step.
    pub sf_object: String,
    /// Local table holding the rows for this object.
    pub table: String,
    pub fields: Vec<FieldMapping>,
    pub lookups: Vec<LookupMapping>,
}

/// Salesforce field to local column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub field: String,
    pub column: String,
}

/// Reference field resolved against another mapped table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupMapping {
    pub field: String,
    /// Table the referenced rows live in.
    pub table: String,
    /// Local column holding the referenced row id.
    pub key_field: String,
}

impl MappingStep {
    /// Columns in binding order: field columns, then lookup key columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|field| field.column.as_str())
            .chain(self.lookups.iter().map(|lookup| lookup.key_field.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct RawStep {
    sf_object: String,
    table: String,
    #[serde(default)]
    fields: RawFields,
    #[serde(default)]
    lookups: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFields {
    List(Vec<String>),
    Map(serde_yaml::Mapping),
}

impl Default for RawFields {
    fn default() -> Self {
        RawFields::List(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct RawLookup {
    table: String,
    #[serde(default)]
    key_field: Option<String>,
}

/// Read and parse a YAML mapping file.
pub fn load_mapping(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path)?;
    parse_mapping(&content)
}

/// Parse YAML mapping content, keeping steps in declaration order.
pub fn parse_mapping(content: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(content)?;
    let Value::Mapping(entries) = value else {
        return Err(Error::InvalidMapping(
            "expected a mapping of step names to steps".to_string(),
        ));
    };

    let mut steps = Vec::with_capacity(entries.len());
    for (name, body) in entries {
        let name = scalar_string(&name)
            .ok_or_else(|| Error::InvalidMapping("step names must be strings".to_string()))?;
        let raw: RawStep = serde_yaml::from_value(body)
            .map_err(|err| Error::InvalidMapping(format!("step '{name}': {err}")))?;
        steps.push(convert_step(name, raw)?);
    }

    Ok(Mapping { steps })
}

fn convert_step(name: String, raw: RawStep) -> Result<MappingStep> {
    let fields = match raw.fields {
        RawFields::List(names) => names
            .into_iter()
            .map(|field| FieldMapping {
                column: field.clone(),
                field,
            })
            .collect(),
        RawFields::Map(entries) => {
            let mut fields = Vec::with_capacity(entries.len());
            for (field, column) in entries {
                let (Some(field), Some(column)) = (scalar_string(&field), scalar_string(&column))
                else {
                    return Err(Error::InvalidMapping(format!(
                        "step '{name}': field entries must map a name to a column"
                    )));
                };
                fields.push(FieldMapping { field, column });
            }
            fields
        }
    };

    let mut lookups = Vec::with_capacity(raw.lookups.len());
    for (field, body) in raw.lookups {
        let field = scalar_string(&field).ok_or_else(|| {
            Error::InvalidMapping(format!("step '{name}': lookup names must be strings"))
        })?;
        let lookup: RawLookup = serde_yaml::from_value(body)
            .map_err(|err| {
                Error::InvalidMapping(format!("step '{name}' lookup '{field}': {err}"))
            })?;
        lookups.push(LookupMapping {
            key_field: lookup.key_field.unwrap_or_else(|| field.clone()),
            table: lookup.table,
            field,
        });
    }

    Ok(MappingStep {
        name,
        sf_object: raw.sf_object,
        table: raw.table,
        fields,
        lookups,
    })
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}
