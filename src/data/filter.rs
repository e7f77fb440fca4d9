use super::model::TimeseriesTable;

// ---------------------------------------------------------------------------
// Column filters over an extracted table
// ---------------------------------------------------------------------------

/// Drop every column holding at least one missing value.
///
/// Returns the filtered table and the names of the dropped columns, in their
/// original order. Rows are never touched.
pub fn drop_na_columns(mut table: TimeseriesTable) -> (TimeseriesTable, Vec<String>) {
    let mut dropped = Vec::new();
    table.retain_columns(|name, values| {
        let complete = !values.iter().any(|v| v.is_nan());
        if !complete {
            dropped.push(name.to_string());
        }
        complete
    });
    (table, dropped)
}

/// Columns of `table` whose name starts with `prefix`, order preserved.
pub fn select_prefixed(table: &TimeseriesTable, prefix: &str) -> TimeseriesTable {
    let mut subset = table.clone();
    subset.retain_columns(|name, _| name.starts_with(prefix));
    subset
}
