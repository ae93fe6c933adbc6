use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeployError, Result};

/// Field carrying the opportunity stage picklist.
pub const STAGE_FIELD: &str = "StageName";

/// Subset of an sObject describe result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SObjectDescribe {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescribe>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescribe {
    pub name: String,
    #[serde(default, rename = "picklistValues")]
    pub picklist_values: Vec<PicklistValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PicklistValue {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
    pub active: bool,
}

impl SObjectDescribe {
    pub fn field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// First active `StageName` value, in describe order.
///
/// Every business process must carry at least one active stage.
pub fn first_active_stage(describe: &SObjectDescribe) -> Result<String> {
    let field = describe
        .field(STAGE_FIELD)
        .ok_or_else(|| DeployError::MissingField {
            sobject: describe.name.clone(),
            field: STAGE_FIELD.to_string(),
        })?;

    field
        .picklist_values
        .iter()
        .find(|value| value.active)
        .map(|value| value.value.clone())
        .ok_or_else(|| DeployError::NoActiveValue {
            field: STAGE_FIELD.to_string(),
        })
}

/// Source of describe results for an org.
#[async_trait]
pub trait DescribeSource: Send + Sync {
    async fn describe(&self, sobject: &str) -> Result<SObjectDescribe>;
}

/// Describe results read from a saved JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileDescribe {
    path: PathBuf,
}

impl JsonFileDescribe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DescribeSource for JsonFileDescribe {
    async fn describe(&self, sobject: &str) -> Result<SObjectDescribe> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let describe: SObjectDescribe = serde_json::from_str(&content)?;
        if describe.name != sobject {
            return Err(DeployError::DescribeMismatch {
                expected: sobject.to_string(),
                found: describe.name,
            });
        }
        debug!(
            event = "describe_loaded",
            sobject,
            fields = describe.fields.len(),
            path = %self.path.display()
        );
        Ok(describe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(json: &str) -> SObjectDescribe {
        serde_json::from_str(json).expect("parse describe")
    }

    #[test]
    fn skips_inactive_values() {
        let describe = describe(
            r#"{
                "name": "Opportunity",
                "fields": [
                    {"name": "Amount"},
                    {"name": "StageName", "picklistValues": [
                        {"value": "Pledged", "active": false},
                        {"value": "Prospecting", "label": "Prospecting", "active": true},
                        {"value": "Closed Won", "active": true}
                    ]}
                ]
            }"#,
        );
        assert_eq!(first_active_stage(&describe).expect("stage"), "Prospecting");
    }

    #[test]
    fn missing_field_is_reported() {
        let describe = describe(r#"{"name": "Opportunity", "fields": [{"name": "Amount"}]}"#);
        let err = first_active_stage(&describe).expect_err("no stage field");
        assert!(matches!(err, DeployError::MissingField { .. }));
    }

    #[test]
    fn all_inactive_is_reported() {
        let describe = describe(
            r#"{"name": "Opportunity", "fields": [
                {"name": "StageName", "picklistValues": [{"value": "Old", "active": false}]}
            ]}"#,
        );
        let err = first_active_stage(&describe).expect_err("no active value");
        assert!(matches!(err, DeployError::NoActiveValue { .. }));
    }

    #[tokio::test]
    async fn json_file_describe_reads_saved_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("opportunity.json");
        std::fs::write(
            &path,
            r#"{"name": "Opportunity", "fields": [{"name": "Amount"}]}"#,
        )
        .expect("write describe");

        let describe = JsonFileDescribe::new(&path)
            .describe("Opportunity")
            .await
            .expect("describe");
        assert_eq!(describe.fields.len(), 1);
    }

    #[tokio::test]
    async fn json_file_describe_reports_unreadable_files() {
        let dir = tempfile::tempdir().expect("temp dir");

        let missing = JsonFileDescribe::new(dir.path().join("missing.json"));
        let err = missing.describe("Opportunity").await.expect_err("no file");
        assert!(matches!(err, DeployError::Io(_)));

        let garbled = dir.path().join("garbled.json");
        std::fs::write(&garbled, "{not json").expect("write garbled");
        let err = JsonFileDescribe::new(garbled)
            .describe("Opportunity")
            .await
            .expect_err("bad json");
        assert!(matches!(err, DeployError::Json(_)));
    }
}
