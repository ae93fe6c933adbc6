use std::time::Instant;

use tracing::{info, warn};

use crate::deployer::{DeployReceipt, Deployer};
use crate::describe::{DescribeSource, first_active_stage};
use crate::error::Result;
use crate::options::BusinessProcessOptions;
use crate::package::build_package;

/// Object whose stage picklist seeds the business process.
pub const STAGE_SOURCE_OBJECT: &str = "Opportunity";

/// Creates a business process with one active stage and a record type bound
/// to it on the configured object.
#[derive(Debug, Clone)]
pub struct SynthesizeBusinessProcess {
    options: BusinessProcessOptions,
}

impl SynthesizeBusinessProcess {
    /// Options are validated up front so a bad developer name fails before
    /// anything is described or built.
    pub fn new(options: BusinessProcessOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &BusinessProcessOptions {
        &self.options
    }

    pub async fn run(
        &self,
        describe_source: &dyn DescribeSource,
        deployer: &dyn Deployer,
    ) -> Result<DeployReceipt> {
        let start = Instant::now();
        let describe = describe_source.describe(STAGE_SOURCE_OBJECT).await?;
        let stage_name = first_active_stage(&describe)?;
        info!(
            event = "stage_selected",
            stage = %stage_name,
            business_process = %self.options.business_process_name
        );

        // The package only lives until the deployer has taken it.
        let workdir = tempfile::tempdir()?;
        let layout = build_package(workdir.path(), &self.options, &stage_name)?;

        let receipt = match deployer.deploy(&layout.root).await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(event = "deploy_failed", sobject = %self.options.sobject, error = %err);
                return Err(err);
            }
        };

        info!(
            event = "business_process_deployed",
            deploy_id = %receipt.deploy_id,
            sobject = %self.options.sobject,
            record_type = %self.options.record_type_developer_name,
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(receipt)
    }
}
