//! Flattening of per-collection timeseries into one wide table.
//!
//! Every selected table is renamed with a `"<entity>:<attribute>: "` prefix
//! and the results are joined column-wise on the shared time index:
//!
//! ```text
//!  generators_t.p   (g1, g2)        ┐
//!  loads_t.p_set    (l1)            ├─▶  generators:p: g1 │ generators:p: g2 │ loads:p_set: l1
//!                                   ┘
//! ```

use crate::data::error::ExtractError;
use crate::data::model::{TimeseriesSource, TimeseriesTable};

/// One `(collection, attribute)` pair to extract, with the column count it is
/// expected to contribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub collection: String,
    pub attribute: String,
    pub expected_width: usize,
}

impl SelectionEntry {
    pub fn new(
        collection: impl Into<String>,
        attribute: impl Into<String>,
        expected_width: usize,
    ) -> Self {
        Self {
            collection: collection.into(),
            attribute: attribute.into(),
            expected_width,
        }
    }
}

/// Column prefix for a timeseries collection attribute.
///
/// The last two characters of the collection name are the `_t` marker of a
/// timeseries collection and are dropped: `("generators_t", "p")` gives
/// `"generators:p: "`.
pub fn column_prefix(collection: &str, attribute: &str) -> String {
    let keep = collection.chars().count().saturating_sub(2);
    let entity: String = collection.chars().take(keep).collect();
    format!("{entity}:{attribute}: ")
}

/// Fetch every selected table, prefix its columns and join them side by side.
///
/// Column order follows `entries`, then the source table's own column order.
/// Rows are aligned on the time index with an outer join, see
/// [`TimeseriesTable::concat_columns`].
pub fn extract_values<S>(
    source: &S,
    entries: &[SelectionEntry],
) -> Result<TimeseriesTable, ExtractError>
where
    S: TimeseriesSource + ?Sized,
{
    if entries.is_empty() {
        return Err(ExtractError::EmptySelection);
    }

    let mut parts = Vec::with_capacity(entries.len());
    for entry in entries {
        let table = source.timeseries(&entry.collection, &entry.attribute)?;
        if table.width() != entry.expected_width {
            return Err(ExtractError::ShapeMismatch {
                collection: entry.collection.clone(),
                attribute: entry.attribute.clone(),
                expected: entry.expected_width,
                actual: table.width(),
            });
        }
        log::debug!(
            "{}.{}: {} rows x {} columns",
            entry.collection,
            entry.attribute,
            table.n_rows(),
            table.width()
        );
        parts.push(
            table
                .clone()
                .with_prefix(&column_prefix(&entry.collection, &entry.attribute)),
        );
    }

    Ok(TimeseriesTable::concat_columns(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::NetworkError;
    use crate::data::fixtures::{labels, table};
    use crate::data::model::Network;

    fn two_table_network() -> Network {
        let mut n = Network::new("n", labels(&["t1", "t2", "t3"]));
        n.insert(
            "generators_t",
            "p",
            table(&["t1", "t2", "t3"], &[("g1", &[1.0, 2.0, 3.0]), ("g2", &[4.0, 5.0, 6.0])]),
        );
        n.insert("loads_t", "p_set", table(&["t1", "t2", "t3"], &[("l1", &[7.0, 8.0, 9.0])]));
        n
    }

    #[test]
    fn prefix_drops_timeseries_marker() {
        assert_eq!(column_prefix("generators_t", "p"), "generators:p: ");
        assert_eq!(
            column_prefix("storage_units_t", "state_of_charge"),
            "storage_units:state_of_charge: "
        );
        assert_eq!(column_prefix("buses_t", "marginal_price"), "buses:marginal_price: ");
    }

    #[test]
    fn prefix_of_short_collection_is_empty_entity() {
        assert_eq!(column_prefix("_t", "p"), ":p: ");
        assert_eq!(column_prefix("x", "p"), ":p: ");
        assert_eq!(column_prefix("bäume_t", "p"), "bäume:p: ");
    }

    #[test]
    fn columns_follow_selection_order() {
        let n = two_table_network();
        let wide = extract_values(
            &n,
            &[
                SelectionEntry::new("loads_t", "p_set", 1),
                SelectionEntry::new("generators_t", "p", 2),
            ],
        )
        .unwrap();
        assert_eq!(
            wide.column_names(),
            ["loads:p_set: l1", "generators:p: g1", "generators:p: g2"]
        );
        assert_eq!(wide.index(), ["t1", "t2", "t3"]);
        assert_eq!(wide.column("generators:p: g2"), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn width_matches_source_tables() {
        let n = two_table_network();
        let entries = [
            SelectionEntry::new("generators_t", "p", 2),
            SelectionEntry::new("loads_t", "p_set", 1),
        ];
        let wide = extract_values(&n, &entries).unwrap();
        for entry in &entries {
            let prefix = column_prefix(&entry.collection, &entry.attribute);
            let contributed = wide
                .column_names()
                .iter()
                .filter(|c| c.starts_with(&prefix))
                .count();
            assert_eq!(contributed, entry.expected_width);
        }
    }

    #[test]
    fn missing_attribute_is_a_lookup_error() {
        let n = two_table_network();
        let err = extract_values(&n, &[SelectionEntry::new("generators_t", "q", 0)]).unwrap_err();
        assert_eq!(
            err,
            ExtractError::Lookup(NetworkError::MissingAttribute {
                collection: "generators_t".into(),
                attribute: "q".into(),
            })
        );
    }

    #[test]
    fn missing_collection_is_a_lookup_error() {
        let n = two_table_network();
        let err = extract_values(&n, &[SelectionEntry::new("links_t", "p0", 0)]).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Lookup(NetworkError::MissingCollection { .. })
        ));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let n = two_table_network();
        let err = extract_values(&n, &[SelectionEntry::new("generators_t", "p", 3)]).unwrap_err();
        assert_eq!(
            err,
            ExtractError::ShapeMismatch {
                collection: "generators_t".into(),
                attribute: "p".into(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn empty_selection_is_rejected() {
        let n = two_table_network();
        assert_eq!(extract_values(&n, &[]).unwrap_err(), ExtractError::EmptySelection);
    }

    #[test]
    fn divergent_indices_are_outer_joined() {
        let mut n = Network::new("n", labels(&["t1", "t2", "t3"]));
        n.insert("generators_t", "p", table(&["t1", "t2", "t3"], &[("g1", &[1.0, 2.0, 3.0])]));
        n.insert("loads_t", "p_set", table(&["t1", "t2"], &[("l1", &[7.0, 8.0])]));

        let wide = extract_values(
            &n,
            &[
                SelectionEntry::new("generators_t", "p", 1),
                SelectionEntry::new("loads_t", "p_set", 1),
            ],
        )
        .unwrap();
        assert_eq!(wide.index(), ["t1", "t2", "t3"]);
        let load = wide.column("loads:p_set: l1").unwrap();
        assert_eq!(&load[..2], &[7.0, 8.0]);
        assert!(load[2].is_nan());
    }
}
