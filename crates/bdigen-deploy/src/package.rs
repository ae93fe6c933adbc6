use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::options::BusinessProcessOptions;

/// Metadata API version written into `package.xml`.
pub const API_VERSION: &str = "45.0";

/// Files written by [`build_package`].
#[derive(Debug, Clone)]
pub struct PackageLayout {
    pub root: PathBuf,
    pub object_path: PathBuf,
    pub package_path: PathBuf,
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `CustomObject` document with one active business process holding
/// `stage_name` and one active record type bound to it.
pub fn render_object_metadata(options: &BusinessProcessOptions, stage_name: &str) -> String {
    let process = escape_xml(&options.business_process_name);
    let stage = escape_xml(stage_name);
    let developer_name = escape_xml(&options.record_type_developer_name);
    let label = escape_xml(&options.record_type_label);

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<CustomObject xmlns="http://soap.sforce.com/2006/04/metadata">
    <businessProcesses>
        <fullName>{process}</fullName>
        <isActive>true</isActive>
        <values>
            <fullName>{stage}</fullName>
            <default>false</default>
        </values>
    </businessProcesses>
    <recordTypes>
        <fullName>{developer_name}</fullName>
        <active>true</active>
        <businessProcess>{process}</businessProcess>
        <label>{label}</label>
    </recordTypes>
</CustomObject>
"#
    )
}

pub fn render_package_xml(api_version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Package xmlns="http://soap.sforce.com/2006/04/metadata">
    <types>
        <members>*</members>
        <name>CustomObject</name>
    </types>
    <version>{}</version>
</Package>"#,
        escape_xml(api_version)
    )
}

/// Write `objects/<sobject>.object` and `package.xml` under `dir`.
pub fn build_package(
    dir: &Path,
    options: &BusinessProcessOptions,
    stage_name: &str,
) -> Result<PackageLayout> {
    let objects_dir = dir.join("objects");
    std::fs::create_dir_all(&objects_dir)?;

    let object_path = objects_dir.join(format!("{}.object", options.sobject));
    std::fs::write(&object_path, render_object_metadata(options, stage_name))?;

    let package_path = dir.join("package.xml");
    std::fs::write(&package_path, render_package_xml(API_VERSION))?;

    Ok(PackageLayout {
        root: dir.to_path_buf(),
        object_path,
        package_path,
    })
}
