use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DeployError, Result};

/// Options for synthesizing a business process and its record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProcessOptions {
    pub business_process_name: String,
    /// Unique developer name; letters, digits and underscores only.
    pub record_type_developer_name: String,
    pub record_type_label: String,
    /// Object that receives the record type and business process.
    pub sobject: String,
}

impl BusinessProcessOptions {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("business_process_name", &self.business_process_name),
            ("record_type_developer_name", &self.record_type_developer_name),
            ("record_type_label", &self.record_type_label),
            ("sobject", &self.sobject),
        ] {
            if value.trim().is_empty() {
                return Err(DeployError::InvalidOption(format!("{name} is required")));
            }
        }

        let word = Regex::new(r"^\w+$")
            .map_err(|err| DeployError::InvalidOption(err.to_string()))?;
        if !word.is_match(&self.record_type_developer_name) {
            return Err(DeployError::InvalidOption(
                "record type developer name must contain only alphanumeric or underscore characters"
                    .to_string(),
            ));
        }
        // The sobject becomes a file name inside the package.
        if !word.is_match(&self.sobject) {
            return Err(DeployError::InvalidOption(format!(
                "sobject '{}' is not a valid object name",
                self.sobject
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(developer_name: &str) -> BusinessProcessOptions {
        BusinessProcessOptions {
            business_process_name: "NPSP Default".to_string(),
            record_type_developer_name: developer_name.to_string(),
            record_type_label: "NPSP Default".to_string(),
            sobject: "Opportunity".to_string(),
        }
    }

    #[test]
    fn accepts_word_characters() {
        assert!(options("NPSP_Default_2").validate().is_ok());
    }

    #[test]
    fn rejects_spaces_and_punctuation() {
        for name in ["NPSP Default", "npsp-default", "npsp.default", ""] {
            let err = options(name).validate().expect_err(name);
            assert!(matches!(err, DeployError::InvalidOption(_)), "{name}");
        }
    }

    #[test]
    fn requires_every_option() {
        let mut opts = options("Donation");
        opts.record_type_label = "  ".to_string();
        let err = opts.validate().expect_err("blank label");
        assert!(err.to_string().contains("record_type_label"));
    }
}
