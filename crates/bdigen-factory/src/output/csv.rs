use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bdigen_core::TableHandle;

use crate::value::Row;

/// Write a table as CSV, header and cells in bound column order.
///
/// Null values and columns a row does not carry are written as empty cells.
/// Returns the number of bytes written.
pub fn write_table_csv(path: &Path, table: &TableHandle, rows: &[Row]) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(&table.columns)?;

    for row in rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                row.get(column)
                    .and_then(|value| value.to_text())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[test]
    fn writes_header_and_blank_nulls() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("payments.csv");
        let table = TableHandle {
            step: "Insert Payments".to_string(),
            sf_object: "npe01__OppPayment__c".to_string(),
            table: "payments".to_string(),
            columns: vec!["id".to_string(), "amount".to_string(), "paid".to_string()],
        };
        let mut row = Row::new();
        row.insert("id".to_string(), FieldValue::Int(1));
        row.insert("amount".to_string(), FieldValue::Null);
        row.insert("paid".to_string(), FieldValue::Bool(true));

        let bytes = write_table_csv(&path, &table, &[row]).expect("write csv");

        let content = std::fs::read_to_string(&path).expect("read csv");
        assert_eq!(content, "id,amount,paid\n1,,true\n");
        assert_eq!(bytes, content.len() as u64);
    }
}
