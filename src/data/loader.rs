use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Network, TimeseriesTable};

/// Text form of temporal snapshot values, the same one `snapshots.csv` and
/// CSV tables carry.
const SNAPSHOT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a solved network from disk.  Dispatch by path.
///
/// Supported layouts:
/// * directory – export folder with `<list>-<attribute>.csv` / `.parquet`
///   files and an optional `snapshots.csv`
/// * `.json`   – `{ "snapshots": [...], "timeseries": { ... } }` holding
///   pandas split-orient frames per collection and attribute
pub fn load_network(path: &Path) -> Result<Network> {
    let mut network = if path.is_dir() {
        load_folder(path)?
    } else {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => load_json(path)?,
            other => bail!("Unsupported network file extension: .{other}"),
        }
    };

    if network.name.is_empty() {
        network.name = scenario_name(path);
    }
    finish_network(&mut network);
    Ok(network)
}

/// Scenario name of a network path: its file stem.
pub fn scenario_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("network")
        .to_string()
}

/// Settle the snapshot axis and materialise the standard attributes that
/// were not on disk as empty tables.
fn finish_network(network: &mut Network) {
    if network.snapshots().is_empty() {
        let mut seen = HashSet::new();
        let mut snapshots = Vec::new();
        for (_, _, table) in network.tables() {
            for label in table.index() {
                if seen.insert(label.clone()) {
                    snapshots.push(label.clone());
                }
            }
        }
        network.set_snapshots(snapshots);
    }

    let added = network.fill_standard_timeseries();
    log::debug!("Added {added} empty standard timeseries tables");
}

// ---------------------------------------------------------------------------
// Export folder loader
// ---------------------------------------------------------------------------

/// Folder layout: one file per time-varying attribute, named
/// `<component list>-<attribute>.<csv|parquet>`. The first column holds the
/// snapshot labels, every other column is one component. Files without a
/// `-` in their stem (static component data) are skipped.
fn load_folder(dir: &Path) -> Result<Network> {
    let mut network = Network::new(scenario_name(dir), Vec::new());

    let snapshots_path = dir.join("snapshots.csv");
    if snapshots_path.is_file() {
        network.set_snapshots(load_snapshot_labels(&snapshots_path)?);
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .collect::<std::io::Result<_>>()
        .context("listing network folder")?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((list, attribute)) = stem.split_once('-') else {
            continue;
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let table = match ext.as_str() {
            "csv" => load_csv_table(&path),
            "parquet" | "pq" => load_parquet_table(&path),
            _ => continue,
        }
        .with_context(|| format!("loading {}", path.display()))?;

        log::debug!("{list}_t.{attribute}: {:?} from {}", table.shape(), path.display());
        network.insert(format!("{list}_t"), attribute, table);
    }

    Ok(network)
}

/// First column of `snapshots.csv`.
fn load_snapshot_labels(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).context("opening snapshots.csv")?;
    let mut labels = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("snapshots.csv row {row_no}"))?;
        labels.push(record.get(0).unwrap_or("").to_string());
    }
    Ok(labels)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row `snapshot,<component>,...`; empty cells are
/// missing values.
fn load_csv_table(path: &Path) -> Result<TimeseriesTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .skip(1)
        .map(|h| h.to_string())
        .collect();

    let mut index = Vec::new();
    let mut data: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        index.push(record.get(0).unwrap_or("").to_string());
        for (col, values) in data.iter_mut().enumerate() {
            let cell = record.get(col + 1).unwrap_or("");
            values.push(parse_cell(cell, row_no, &headers[col])?);
        }
    }

    Ok(TimeseriesTable::new(index, headers, data)?)
}

fn parse_cell(s: &str, row: usize, col: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, column '{col}': '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema: first column is the snapshot (string, or timestamp/date
/// rendered as `SNAPSHOT_FORMAT`); all other columns are numeric. Nulls
/// become `NaN`.
fn load_parquet_table(path: &Path) -> Result<TimeseriesTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let snapshot_options = FormatOptions::new()
        .with_timestamp_format(Some(SNAPSHOT_FORMAT))
        .with_timestamp_tz_format(Some(SNAPSHOT_FORMAT))
        .with_datetime_format(Some(SNAPSHOT_FORMAT));
    let mut headers: Option<Vec<String>> = None;
    let mut index = Vec::new();
    let mut data: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if batch.num_columns() == 0 {
            bail!("Parquet file has no snapshot column");
        }

        if headers.is_none() {
            let names: Vec<String> = batch
                .schema()
                .fields()
                .iter()
                .skip(1)
                .map(|f| f.name().clone())
                .collect();
            data = vec![Vec::new(); names.len()];
            headers = Some(names);
        }

        let snapshots = ArrayFormatter::try_new(batch.column(0).as_ref(), &snapshot_options)
            .context("formatting snapshot column")?;
        for row in 0..batch.num_rows() {
            index.push(
                snapshots
                    .value(row)
                    .try_to_string()
                    .with_context(|| format!("Row {row}: failed to read snapshot"))?,
            );
        }

        for (values, col) in data.iter_mut().zip(batch.columns().iter().skip(1)) {
            values.extend(column_to_f64(col)?);
        }
    }

    Ok(TimeseriesTable::new(index, headers.unwrap_or_default(), data)?)
}

/// Cast any numeric Arrow column to `f64`, nulls as `NaN`.
fn column_to_f64(col: &ArrayRef) -> Result<Vec<f64>> {
    let casted = cast(col, &DataType::Float64)
        .with_context(|| format!("cannot read {:?} column as numbers", col.data_type()))?;
    let floats = casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .context("expected Float64Array after cast")?;
    Ok(floats.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// A frame in pandas' `orient="split"` layout.
#[derive(Debug, Deserialize)]
struct SplitFrame {
    #[serde(default)]
    index: Option<Vec<String>>,
    columns: Vec<String>,
    /// Row-major values, `null` for missing.
    data: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct JsonNetwork {
    #[serde(default)]
    name: String,
    #[serde(default)]
    snapshots: Vec<String>,
    timeseries: BTreeMap<String, BTreeMap<String, SplitFrame>>,
}

/// Expected JSON schema:
///
/// ```json
/// {
///   "snapshots": ["2013-01-01 00:00:00", ...],
///   "timeseries": {
///     "generators_t": {
///       "p": { "index": [...], "columns": ["g1", "g2"], "data": [[1.0, 2.0], ...] }
///     }
///   }
/// }
/// ```
///
/// A frame without `index` uses the network snapshots.
fn load_json(path: &Path) -> Result<Network> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonNetwork = serde_json::from_str(&text).context("parsing JSON")?;

    let mut network = Network::new(root.name, root.snapshots);
    for (collection, attributes) in root.timeseries {
        for (attribute, frame) in attributes {
            let table = split_frame_to_table(frame, network.snapshots())
                .with_context(|| format!("{collection}.{attribute}"))?;
            network.insert(collection.as_str(), attribute, table);
        }
    }
    Ok(network)
}

fn split_frame_to_table(frame: SplitFrame, snapshots: &[String]) -> Result<TimeseriesTable> {
    let index = frame.index.unwrap_or_else(|| snapshots.to_vec());
    if frame.data.len() != index.len() {
        bail!("{} data rows for {} index labels", frame.data.len(), index.len());
    }

    let mut data: Vec<Vec<f64>> = vec![Vec::with_capacity(index.len()); frame.columns.len()];
    for (row_no, row) in frame.data.iter().enumerate() {
        if row.len() != frame.columns.len() {
            bail!(
                "Row {row_no}: {} values but {} columns",
                row.len(),
                frame.columns.len()
            );
        }
        for (values, cell) in data.iter_mut().zip(row) {
            values.push(cell.unwrap_or(f64::NAN));
        }
    }

    Ok(TimeseriesTable::new(index, frame.columns, data)?)
}
