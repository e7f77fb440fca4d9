use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::model::TimeseriesTable;

/// Name of the leading snapshot label column in every written table.
pub const SNAPSHOT_COLUMN: &str = "snapshot";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write a table to `path`.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – `snapshot` string column + one nullable Float64 column per series
/// * `.csv`             – header row, empty cells for missing values
/// * `.json`            – `{ "index": [...], "columns": [...], "data": [[...], ...] }`
pub fn write_table(table: &TimeseriesTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => write_parquet(table, path),
        "csv" => write_csv(table, path),
        "json" => write_json(table, path),
        other => bail!("Unsupported output extension: .{other}"),
    }
    .with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Arrow / Parquet
// ---------------------------------------------------------------------------

/// Convert a table to a single Arrow record batch. Missing values become
/// nulls.
pub fn to_record_batch(table: &TimeseriesTable) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.width() + 1);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.width() + 1);

    fields.push(Field::new(SNAPSHOT_COLUMN, DataType::Utf8, false));
    arrays.push(Arc::new(StringArray::from(
        table.index().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    )));

    for (name, values) in table.columns() {
        fields.push(Field::new(name, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(
            values
                .iter()
                .map(|v| (!v.is_nan()).then_some(*v))
                .collect::<Vec<_>>(),
        )));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building record batch")
}

fn write_parquet(table: &TimeseriesTable, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn write_csv(table: &TimeseriesTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;

    let mut header = vec![SNAPSHOT_COLUMN];
    header.extend(table.column_names().iter().map(|s| s.as_str()));
    writer.write_record(&header).context("writing CSV header")?;

    let columns: Vec<&[f64]> = table.columns().map(|(_, values)| values).collect();
    for (row, label) in table.index().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(label.clone());
        record.extend(columns.iter().map(|values| format_cell(values[row])));
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn format_cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// pandas' `orient="split"` layout.
#[derive(Serialize)]
struct SplitFrameRef<'a> {
    index: &'a [String],
    columns: &'a [String],
    data: Vec<Vec<Option<f64>>>,
}

fn write_json(table: &TimeseriesTable, path: &Path) -> Result<()> {
    let columns: Vec<&[f64]> = table.columns().map(|(_, values)| values).collect();
    let data = (0..table.n_rows())
        .map(|row| {
            columns
                .iter()
                .map(|values| Some(values[row]).filter(|v| !v.is_nan()))
                .collect()
        })
        .collect();
    let frame = SplitFrameRef {
        index: table.index(),
        columns: table.column_names(),
        data,
    };

    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer(std::io::BufWriter::new(file), &frame).context("serializing JSON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::table;
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn sample() -> TimeseriesTable {
        table(
            &["t1", "t2"],
            &[("buses:p: b1", &[1.5, f64::NAN]), ("buses:p: b2", &[-2.0, 0.0])],
        )
    }

    #[test]
    fn record_batch_has_snapshot_column_and_nulls() {
        let batch = to_record_batch(&sample()).unwrap();
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, ["snapshot", "buses:p: b1", "buses:p: b2"]);
        assert_eq!(batch.num_rows(), 2);
        assert!(batch.column(1).is_null(1));
        assert!(!batch.column(2).is_null(1));
    }

    #[test]
    fn csv_leaves_missing_cells_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/out.csv");
        write_table(&sample(), &path).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "snapshot,buses:p: b1,buses:p: b2\nt1,1.5,-2\nt2,,0\n"
        );
    }

    #[test]
    fn json_uses_split_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.json");
        write_table(&sample(), &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "index": ["t1", "t2"],
                "columns": ["buses:p: b1", "buses:p: b2"],
                "data": [[1.5, -2.0], [null, 0.0]]
            })
        );
    }

    #[test]
    fn parquet_keeps_column_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.parquet");
        write_table(&sample(), &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        let schema = batches[0].schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, ["snapshot", "buses:p: b1", "buses:p: b2"]);
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = write_table(&sample(), &tmp.path().join("out.P")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported output extension"));
    }
}
