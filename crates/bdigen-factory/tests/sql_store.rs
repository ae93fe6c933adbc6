use std::path::PathBuf;

use bdigen_core::{BoundSchema, bind, load_mapping};
use bdigen_factory::{FactoryError, GenerateOptions, GenerationEngine, SqlStore};

fn bound_schema() -> BoundSchema {
    let path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../mappings/bdi.mapping.yml");
    let mapping = load_mapping(&path).expect("load mapping");
    bind(&mapping).expect("bind mapping")
}

fn sqlite_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("bdi.db").display())
}

#[tokio::test]
async fn persists_a_run_into_sqlite() {
    let schema = bound_schema();
    let out = tempfile::tempdir().expect("temp dir");
    let result = GenerationEngine::new(GenerateOptions {
        out_dir: out.path().to_path_buf(),
        num_records: 20,
    })
    .run(&schema)
    .expect("run generation");

    let db_dir = tempfile::tempdir().expect("db dir");
    let store = SqlStore::connect(&sqlite_url(&db_dir))
        .await
        .expect("connect sqlite");
    store.prepare(&schema).await.expect("prepare tables");

    let inserted = store
        .write_all(&schema, &result.store)
        .await
        .expect("write run");
    assert_eq!(inserted, result.report.rows_total);

    assert_eq!(store.count("accounts").await.expect("count"), 10);
    assert_eq!(store.count("payments").await.expect("count"), 16);
    assert_eq!(store.count("npsp__DataImport__c").await.expect("count"), 40);
    store.close().await;
}

#[tokio::test]
async fn refuses_tables_that_already_hold_rows() {
    let schema = bound_schema();
    let out = tempfile::tempdir().expect("temp dir");
    let result = GenerationEngine::new(GenerateOptions {
        out_dir: out.path().to_path_buf(),
        num_records: 10,
    })
    .run(&schema)
    .expect("run generation");

    let db_dir = tempfile::tempdir().expect("db dir");
    let url = sqlite_url(&db_dir);

    let store = SqlStore::connect(&url).await.expect("connect sqlite");
    store.prepare(&schema).await.expect("prepare tables");
    store
        .write_all(&schema, &result.store)
        .await
        .expect("write run");
    store.close().await;

    let store = SqlStore::connect(&url).await.expect("reconnect sqlite");
    let err = store
        .prepare(&schema)
        .await
        .expect_err("second run must not mix with the first");
    match err {
        FactoryError::TableNotEmpty { table, rows } => {
            assert_eq!(table, "accounts");
            assert_eq!(rows, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
    store.close().await;
}
