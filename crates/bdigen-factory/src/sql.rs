use std::sync::Once;
use std::time::Instant;

use bdigen_core::{BoundSchema, ID_COLUMN, TableHandle};
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::info;

use crate::errors::FactoryError;
use crate::store::MemoryStore;

static INSTALL_DRIVERS: Once = Once::new();

/// Database-backed destination for a generated run (SQLite or Postgres).
///
/// Tables are created from the bound mapping: `id BIGINT PRIMARY KEY` plus
/// one `TEXT` column per mapped field or lookup.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: AnyPool,
}

impl SqlStore {
    pub async fn connect(url: &str) -> Result<Self, FactoryError> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create missing tables and refuse to continue if any already has rows.
    ///
    /// Id sequences and name counters start at 1 on every run, so rows left
    /// over from an earlier run would collide with the new ones.
    pub async fn prepare(&self, schema: &BoundSchema) -> Result<(), FactoryError> {
        for handle in &schema.tables {
            sqlx::query(&create_table_sql(handle))
                .execute(&self.pool)
                .await?;

            let rows = self.count(&handle.table).await?;
            if rows > 0 {
                return Err(FactoryError::TableNotEmpty {
                    table: handle.table.clone(),
                    rows,
                });
            }
        }
        Ok(())
    }

    pub async fn count(&self, table: &str) -> Result<i64, FactoryError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let rows: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(rows)
    }

    /// Insert every stored row in mapping order inside one transaction.
    pub async fn write_all(
        &self,
        schema: &BoundSchema,
        store: &MemoryStore,
    ) -> Result<u64, FactoryError> {
        let start = Instant::now();
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0_u64;

        for handle in &schema.tables {
            let sql = insert_sql(handle);
            let rows = store.rows(&handle.table);

            for row in rows {
                let id = row
                    .get(ID_COLUMN)
                    .and_then(|value| value.as_i64())
                    .ok_or_else(|| {
                        FactoryError::InvalidParams(format!(
                            "row in '{}' has no integer id",
                            handle.table
                        ))
                    })?;

                let mut query = sqlx::query(&sql).bind(id);
                for column in handle.columns.iter().skip(1) {
                    let text = row.get(column).and_then(|value| value.to_text());
                    query = query.bind(text);
                }
                query.execute(&mut *tx).await?;
            }

            inserted += rows.len() as u64;
            info!(event = "table_persisted", table = %handle.table, rows = rows.len());
        }

        tx.commit().await?;
        info!(
            event = "run_persisted",
            rows = inserted,
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(inserted)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(handle: &TableHandle) -> String {
    let mut columns = vec![format!("{} BIGINT PRIMARY KEY", quote_ident(ID_COLUMN))];
    columns.extend(
        handle
            .columns
            .iter()
            .skip(1)
            .map(|column| format!("{} TEXT", quote_ident(column))),
    );
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(&handle.table),
        columns.join(", ")
    )
}

fn insert_sql(handle: &TableHandle) -> String {
    let columns: Vec<String> = handle.columns.iter().map(|c| quote_ident(c)).collect();
    let placeholders: Vec<String> = (1..=handle.columns.len())
        .map(|idx| format!("${idx}"))
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&handle.table),
        columns.join(", "),
        placeholders.join(", ")
    )
}
