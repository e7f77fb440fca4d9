use std::collections::{BTreeMap, HashMap, HashSet};

use super::error::{NetworkError, TableError};

// ---------------------------------------------------------------------------
// TimeseriesTable – one attribute of one collection, or a wide extract
// ---------------------------------------------------------------------------

/// A table of `f64` values indexed by snapshot label.
///
/// Columns are stored column-major in insertion order. `f64::NAN` marks a
/// missing value, the same way pandas does for float frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesTable {
    /// Snapshot labels (row index), unique.
    index: Vec<String>,
    /// Column names in order.
    columns: Vec<String>,
    /// One `Vec` per column, each `index.len()` long.
    data: Vec<Vec<f64>>,
}

impl TimeseriesTable {
    /// Build a table, checking that every column spans the whole index.
    pub fn new(
        index: Vec<String>,
        columns: Vec<String>,
        data: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        if columns.len() != data.len() {
            return Err(TableError::ColumnCountMismatch {
                names: columns.len(),
                columns: data.len(),
            });
        }
        for (name, values) in columns.iter().zip(&data) {
            if values.len() != index.len() {
                return Err(TableError::LengthMismatch {
                    column: name.clone(),
                    expected: index.len(),
                    actual: values.len(),
                });
            }
        }
        let mut seen = HashSet::with_capacity(index.len());
        for label in &index {
            if !seen.insert(label.as_str()) {
                return Err(TableError::DuplicateSnapshot(label.clone()));
            }
        }
        Ok(Self {
            index,
            columns,
            data,
        })
    }

    /// A table with no columns over the given index.
    pub fn empty(index: Vec<String>) -> Self {
        Self {
            index,
            columns: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Values of the first column called `name`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
    }

    /// Iterate `(name, values)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
        self.columns
            .iter()
            .zip(&self.data)
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.width())
    }

    /// Same table with `prefix` prepended to every column name.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        for name in &mut self.columns {
            name.insert_str(0, prefix);
        }
        self
    }

    /// Keep only the columns for which `keep(name, values)` holds.
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &[f64]) -> bool,
    {
        let columns = std::mem::take(&mut self.columns);
        let data = std::mem::take(&mut self.data);
        for (name, values) in columns.into_iter().zip(data) {
            if keep(&name, &values) {
                self.columns.push(name);
                self.data.push(values);
            }
        }
    }

    /// Join tables side by side, aligning rows on the time index.
    ///
    /// The result index is the union of all input indices in first-seen
    /// order. A source that lacks a snapshot contributes `NaN` cells for it;
    /// rows are never dropped.
    pub fn concat_columns<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = TimeseriesTable>,
    {
        let tables: Vec<TimeseriesTable> = tables.into_iter().collect();
        let Some(first) = tables.first() else {
            return Self::empty(Vec::new());
        };

        let aligned = tables.iter().all(|t| t.index == first.index);
        let index = if aligned {
            first.index.clone()
        } else {
            union_index(&tables)
        };

        let width = tables.iter().map(TimeseriesTable::width).sum();
        let mut columns = Vec::with_capacity(width);
        let mut data = Vec::with_capacity(width);

        for table in tables {
            if table.index == index {
                columns.extend(table.columns);
                data.extend(table.data);
                continue;
            }
            let positions: HashMap<&str, usize> = table
                .index
                .iter()
                .enumerate()
                .map(|(row, label)| (label.as_str(), row))
                .collect();
            let rows: Vec<Option<usize>> = index
                .iter()
                .map(|label| positions.get(label.as_str()).copied())
                .collect();
            for (name, values) in table.columns.into_iter().zip(table.data) {
                columns.push(name);
                data.push(
                    rows.iter()
                        .map(|row| row.map_or(f64::NAN, |r| values[r]))
                        .collect(),
                );
            }
        }

        Self {
            index,
            columns,
            data,
        }
    }
}

fn union_index(tables: &[TimeseriesTable]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut index = Vec::new();
    for label in tables.iter().flat_map(|t| t.index.iter()) {
        if seen.insert(label.as_str()) {
            index.push(label.clone());
        }
    }
    index
}

// ---------------------------------------------------------------------------
// Network – the solved model, as far as timeseries are concerned
// ---------------------------------------------------------------------------

/// Time-varying attributes every solved network exposes per component list,
/// even when none of its components set them.
pub const STANDARD_TIMESERIES: &[(&str, &[&str])] = &[
    ("buses", &["v_mag_pu_set", "p", "q", "v_mag_pu", "v_ang", "marginal_price"]),
    (
        "generators",
        &[
            "p_min_pu", "p_max_pu", "p_set", "q_set", "marginal_cost", "efficiency",
            "p", "q", "status", "mu_upper", "mu_lower",
        ],
    ),
    ("loads", &["p_set", "q_set", "p", "q"]),
    (
        "storage_units",
        &[
            "p_min_pu", "p_max_pu", "state_of_charge_set", "inflow", "p_set", "q_set",
            "marginal_cost", "p", "p_dispatch", "p_store", "q", "state_of_charge",
            "spill", "mu_upper", "mu_lower", "mu_state_of_charge_set", "mu_energy_balance",
        ],
    ),
    (
        "stores",
        &[
            "e_min_pu", "e_max_pu", "p_set", "q_set", "marginal_cost", "p", "q", "e",
            "mu_upper", "mu_lower", "mu_energy_balance",
        ],
    ),
    ("lines", &["s_max_pu", "p0", "q0", "p1", "q1", "mu_lower", "mu_upper"]),
    (
        "links",
        &[
            "p_min_pu", "p_max_pu", "p_set", "efficiency", "marginal_cost", "p0", "p1",
            "status", "mu_lower", "mu_upper",
        ],
    ),
    ("transformers", &["s_max_pu", "p0", "q0", "p1", "q1", "mu_lower", "mu_upper"]),
];

/// Anything that can hand out timeseries tables by (collection, attribute).
pub trait TimeseriesSource {
    fn timeseries(&self, collection: &str, attribute: &str)
        -> Result<&TimeseriesTable, NetworkError>;
}

/// A solved network: named collections (`"generators_t"`, `"buses_t"`, ...)
/// each holding one table per time-varying attribute.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub name: String,
    /// Shared time axis.
    snapshots: Vec<String>,
    collections: BTreeMap<String, BTreeMap<String, TimeseriesTable>>,
}

impl Network {
    /// A bare network holding no tables at all.
    pub fn new(name: impl Into<String>, snapshots: Vec<String>) -> Self {
        Self {
            name: name.into(),
            snapshots,
            collections: BTreeMap::new(),
        }
    }

    /// A network that already exposes every [`STANDARD_TIMESERIES`] attribute
    /// as an empty table over `snapshots`, like a freshly solved one.
    /// Inserting a table replaces the empty placeholder.
    pub fn with_standard_timeseries(name: impl Into<String>, snapshots: Vec<String>) -> Self {
        let mut network = Self::new(name, snapshots);
        network.fill_standard_timeseries();
        network
    }

    /// Add an empty table over the current snapshots for each standard
    /// attribute not present yet. Returns how many were added.
    pub fn fill_standard_timeseries(&mut self) -> usize {
        let mut added = 0;
        for (list, attributes) in STANDARD_TIMESERIES {
            let collection = format!("{list}_t");
            for attribute in *attributes {
                if !self.contains(&collection, attribute) {
                    let table = TimeseriesTable::empty(self.snapshots.clone());
                    self.insert(collection.as_str(), *attribute, table);
                    added += 1;
                }
            }
        }
        added
    }

    pub fn snapshots(&self) -> &[String] {
        &self.snapshots
    }

    pub fn set_snapshots(&mut self, snapshots: Vec<String>) {
        self.snapshots = snapshots;
    }

    /// Add or replace the table for `collection.attribute`.
    pub fn insert(
        &mut self,
        collection: impl Into<String>,
        attribute: impl Into<String>,
        table: TimeseriesTable,
    ) {
        self.collections
            .entry(collection.into())
            .or_default()
            .insert(attribute.into(), table);
    }

    pub fn contains(&self, collection: &str, attribute: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|attrs| attrs.contains_key(attribute))
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.collections.keys().map(String::as_str)
    }

    /// Attribute names of `collection`, empty if it does not exist.
    pub fn attribute_names<'a>(
        &'a self,
        collection: &str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(|attrs| attrs.keys().map(String::as_str))
    }

    /// Iterate every table with its collection and attribute name.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &str, &TimeseriesTable)> + '_ {
        self.collections.iter().flat_map(|(collection, attrs)| {
            attrs
                .iter()
                .map(move |(attribute, table)| (collection.as_str(), attribute.as_str(), table))
        })
    }
}

impl TimeseriesSource for Network {
    fn timeseries(
        &self,
        collection: &str,
        attribute: &str,
    ) -> Result<&TimeseriesTable, NetworkError> {
        let attrs = self
            .collections
            .get(collection)
            .ok_or_else(|| NetworkError::MissingCollection {
                collection: collection.to_string(),
            })?;
        attrs
            .get(attribute)
            .ok_or_else(|| NetworkError::MissingAttribute {
                collection: collection.to_string(),
                attribute: attribute.to_string(),
            })
    }
}
