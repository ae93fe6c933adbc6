use std::path::Path;

use bdigen_core::{Error, bind, load_mapping, parse_mapping};

fn bdi_mapping_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../mappings/bdi.mapping.yml")
}

#[test]
fn bundled_mapping_binds_every_table() {
    let mapping = load_mapping(&bdi_mapping_path()).expect("load bundled mapping");
    let schema = bind(&mapping).expect("bind bundled mapping");

    let tables: Vec<&str> = schema.tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(
        tables,
        vec![
            "accounts",
            "contacts",
            "opportunities",
            "payments",
            "npsp__DataImport__c"
        ]
    );

    let opportunities = schema.table("opportunities").expect("opportunities handle");
    assert_eq!(
        opportunities.columns,
        vec![
            "id",
            "name",
            "amount",
            "stage_name",
            "close_date",
            "account_id",
            "primary_contact__c"
        ]
    );
    assert_eq!(opportunities.sf_object, "Opportunity");
}

#[test]
fn require_reports_missing_columns() {
    let mapping = load_mapping(&bdi_mapping_path()).expect("load bundled mapping");
    let schema = bind(&mapping).expect("bind bundled mapping");

    schema
        .require("accounts", &["id", "name", "record_type"])
        .expect("accounts carries its columns");

    let err = schema
        .require("accounts", &["id", "website"])
        .expect_err("website is not mapped");
    assert!(matches!(
        err,
        Error::MissingColumn { ref table, ref column } if table == "accounts" && column == "website"
    ));

    let err = schema.require("leads", &["id"]).expect_err("leads is not mapped");
    assert!(matches!(err, Error::MissingTable(ref table) if table == "leads"));
}

#[test]
fn bind_rejects_duplicate_tables() {
    let mapping = parse_mapping(
        r#"
First:
  sf_object: Account
  table: accounts
Second:
  sf_object: Account
  table: accounts
"#,
    )
    .expect("parse mapping");

    let err = bind(&mapping).expect_err("duplicate table");
    assert!(err.to_string().contains("declared by both"));
}

#[test]
fn bind_rejects_columns_named_id() {
    let mapping = parse_mapping(
        r#"
Insert Accounts:
  sf_object: Account
  table: accounts
  fields:
    Id: id
"#,
    )
    .expect("parse mapping");

    let err = bind(&mapping).expect_err("id clashes with implicit key");
    assert!(matches!(err, Error::InvalidMapping(_)));
}

#[test]
fn bind_rejects_dangling_lookups() {
    let mapping = parse_mapping(
        r#"
Insert Opportunities:
  sf_object: Opportunity
  table: opportunities
  lookups:
    AccountId:
      table: accounts
"#,
    )
    .expect("parse mapping");

    let err = bind(&mapping).expect_err("accounts is not declared");
    assert!(err.to_string().contains("undeclared table 'accounts'"));
}

#[test]
fn bound_schema_serializes_for_run_artifacts() {
    let mapping = load_mapping(&bdi_mapping_path()).expect("load bundled mapping");
    let schema = bind(&mapping).expect("bind bundled mapping");

    let json = serde_json::to_value(&schema).expect("serialize bound schema");
    let first = &json["tables"][0];
    assert_eq!(first["step"], "Insert Accounts");
    assert_eq!(first["columns"][0], "id");
}
