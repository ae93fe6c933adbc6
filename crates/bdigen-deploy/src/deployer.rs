use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DeployError, Result};

/// Outcome of handing a package to a deployer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployReceipt {
    pub deploy_id: String,
    /// Where the package ended up, when the deployer keeps a copy.
    pub location: Option<PathBuf>,
    /// Package-relative paths of every deployed file.
    pub files: Vec<PathBuf>,
}

/// Deploys a directory containing `package.xml` and its metadata files.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(&self, package_dir: &Path) -> Result<DeployReceipt>;
}

/// Stages packages under `<root>/<timestamp>__deploy_<id>` for a later
/// metadata deploy.
#[derive(Debug, Clone)]
pub struct DirectoryDeployer {
    root: PathBuf,
}

impl DirectoryDeployer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Deployer for DirectoryDeployer {
    async fn deploy(&self, package_dir: &Path) -> Result<DeployReceipt> {
        if !package_dir.join("package.xml").is_file() {
            return Err(DeployError::Deploy(format!(
                "{} has no package.xml",
                package_dir.display()
            )));
        }

        let deploy_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let target = self.root.join(format!("{timestamp}__deploy_{deploy_id}"));

        let mut files = Vec::new();
        copy_tree(package_dir, &target, Path::new(""), &mut files)?;
        files.sort();

        info!(
            event = "package_staged",
            deploy_id = %deploy_id,
            files = files.len(),
            location = %target.display()
        );

        Ok(DeployReceipt {
            deploy_id,
            location: Some(target),
            files,
        })
    }
}

fn copy_tree(
    source: &Path,
    target: &Path,
    relative: &Path,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    std::fs::create_dir_all(target)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let name = entry.file_name();
        let from = entry.path();
        let to = target.join(&name);
        if entry.file_type()?.is_dir() {
            copy_tree(&from, &to, &relative.join(&name), files)?;
        } else {
            std::fs::copy(&from, &to)?;
            files.push(relative.join(&name));
        }
    }
    Ok(())
}
