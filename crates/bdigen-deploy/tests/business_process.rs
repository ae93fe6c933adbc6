use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use bdigen_deploy::{
    BusinessProcessOptions, DeployError, DeployReceipt, Deployer, DirectoryDeployer,
    JsonFileDescribe, SynthesizeBusinessProcess,
};

fn describe_fixture() -> JsonFileDescribe {
    JsonFileDescribe::new(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/opportunity.describe.json"),
    )
}

fn options(sobject: &str) -> BusinessProcessOptions {
    BusinessProcessOptions {
        business_process_name: "NPSP Default".to_string(),
        record_type_developer_name: "NPSP_Default".to_string(),
        record_type_label: "NPSP Default".to_string(),
        sobject: sobject.to_string(),
    }
}

/// Captures package contents before the temporary directory goes away.
#[derive(Default)]
struct RecordingDeployer {
    seen: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Deployer for RecordingDeployer {
    async fn deploy(&self, package_dir: &Path) -> bdigen_deploy::Result<DeployReceipt> {
        let object = std::fs::read_to_string(package_dir.join("objects/Opportunity.object"))?;
        let package = std::fs::read_to_string(package_dir.join("package.xml"))?;
        self.seen
            .lock()
            .map_err(|_| DeployError::Deploy("poisoned".to_string()))?
            .push((object, package));
        Ok(DeployReceipt {
            deploy_id: "recorded".to_string(),
            location: None,
            files: vec![
                PathBuf::from("objects/Opportunity.object"),
                PathBuf::from("package.xml"),
            ],
        })
    }
}

#[tokio::test]
async fn builds_package_with_first_active_stage() {
    let task = SynthesizeBusinessProcess::new(options("Opportunity")).expect("valid options");
    let deployer = RecordingDeployer::default();

    let receipt = task
        .run(&describe_fixture(), &deployer)
        .await
        .expect("run task");
    assert_eq!(receipt.deploy_id, "recorded");

    let seen = deployer.seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    let (object, package) = &seen[0];
    assert!(object.contains("<fullName>Prospecting</fullName>"));
    assert!(!object.contains("Pledged"));
    assert!(object.contains("<fullName>NPSP_Default</fullName>"));
    assert!(object.contains("<businessProcess>NPSP Default</businessProcess>"));
    assert!(package.contains("<version>45.0</version>"));
}

#[tokio::test]
async fn directory_deployer_stages_a_copy() {
    let root = tempfile::tempdir().expect("temp dir");
    let task = SynthesizeBusinessProcess::new(options("Opportunity")).expect("valid options");
    let deployer = DirectoryDeployer::new(root.path());

    let receipt = task
        .run(&describe_fixture(), &deployer)
        .await
        .expect("run task");

    let location = receipt.location.expect("staged location");
    assert!(location.starts_with(root.path()));
    let dir_name = location
        .file_name()
        .and_then(|name| name.to_str())
        .expect("dir name");
    assert!(dir_name.ends_with(&format!("__deploy_{}", receipt.deploy_id)));
    assert_eq!(
        receipt.files,
        vec![
            PathBuf::from("objects").join("Opportunity.object"),
            PathBuf::from("package.xml"),
        ]
    );
    assert!(location.join("objects/Opportunity.object").is_file());
}

#[tokio::test]
async fn describe_of_another_object_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("account.describe.json");
    std::fs::write(&path, r#"{"name": "Account", "fields": []}"#).expect("write describe");

    let task = SynthesizeBusinessProcess::new(options("Opportunity")).expect("valid options");
    let err = task
        .run(&JsonFileDescribe::new(path), &RecordingDeployer::default())
        .await
        .expect_err("wrong describe");
    assert!(matches!(err, DeployError::DescribeMismatch { .. }));
}

#[test]
fn invalid_developer_name_fails_before_running() {
    let mut opts = options("Opportunity");
    opts.record_type_developer_name = "NPSP Default".to_string();
    let err = SynthesizeBusinessProcess::new(opts).expect_err("invalid name");
    assert!(matches!(err, DeployError::InvalidOption(_)));
}

#[tokio::test]
async fn deployer_rejects_directories_without_manifest() {
    let root = tempfile::tempdir().expect("root");
    let empty = tempfile::tempdir().expect("empty");
    let err = DirectoryDeployer::new(root.path())
        .deploy(empty.path())
        .await
        .expect_err("no package.xml");
    assert!(matches!(err, DeployError::Deploy(_)));
}
