//! Metadata deployment helper: synthesizes a business process and a record
//! type bound to it, then hands the package to a deployer.

pub mod deployer;
pub mod describe;
pub mod error;
pub mod options;
pub mod package;
pub mod task;

pub use deployer::{DeployReceipt, Deployer, DirectoryDeployer};
pub use describe::{DescribeSource, JsonFileDescribe, SObjectDescribe, first_active_stage};
pub use error::{DeployError, Result};
pub use options::BusinessProcessOptions;
pub use package::{
    API_VERSION, PackageLayout, build_package, render_object_metadata, render_package_xml,
};
pub use task::SynthesizeBusinessProcess;
