//! Input and output tables of a solved network.

use crate::data::error::ExtractError;
use crate::data::filter::{drop_na_columns, select_prefixed};
use crate::data::model::{TimeseriesSource, TimeseriesTable};
use crate::extract::extract_values;
use crate::selection::SelectionSchema;

/// Column prefix of nodal active power in the outputs table.
pub const NODAL_POWER_PREFIX: &str = "buses:p: ";

/// Outputs table plus the columns the NaN filter removed.
#[derive(Debug, Clone)]
pub struct Outputs {
    pub table: TimeseriesTable,
    pub dropped: Vec<String>,
}

/// Result timeseries of the built-in output schema.
///
/// Unless `keep_na_columns` is set, every column with a missing value in any
/// row is dropped.
pub fn get_outputs_df<S>(
    network: &S,
    keep_na_columns: bool,
) -> Result<TimeseriesTable, ExtractError>
where
    S: TimeseriesSource + ?Sized,
{
    select_outputs(network, &SelectionSchema::outputs_v1(), keep_na_columns).map(|o| o.table)
}

/// Exogenous timeseries of the built-in input schema, never filtered.
pub fn get_inputs_df<S>(network: &S) -> Result<TimeseriesTable, ExtractError>
where
    S: TimeseriesSource + ?Sized,
{
    select_inputs(network, &SelectionSchema::inputs_v1())
}

pub fn select_outputs<S>(
    network: &S,
    schema: &SelectionSchema,
    keep_na_columns: bool,
) -> Result<Outputs, ExtractError>
where
    S: TimeseriesSource + ?Sized,
{
    let entries = schema.resolve(network)?;
    let table = extract_values(network, &entries)?;
    if keep_na_columns {
        return Ok(Outputs {
            table,
            dropped: Vec::new(),
        });
    }

    let (table, dropped) = drop_na_columns(table);
    if !dropped.is_empty() {
        log::info!(
            "Dropped {} output columns with missing values",
            dropped.len()
        );
        log::debug!("Dropped columns: {dropped:?}");
    }
    Ok(Outputs { table, dropped })
}

pub fn select_inputs<S>(
    network: &S,
    schema: &SelectionSchema,
) -> Result<TimeseriesTable, ExtractError>
where
    S: TimeseriesSource + ?Sized,
{
    let entries = schema.resolve(network)?;
    extract_values(network, &entries)
}

/// Nodal power columns of an already computed outputs table.
pub fn nodal_power(outputs: &TimeseriesTable) -> TimeseriesTable {
    select_prefixed(outputs, NODAL_POWER_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::NetworkError;
    use crate::data::fixtures::{labels, solved_network, table, SNAPSHOTS};
    use crate::data::model::Network;
    use crate::selection::FieldRef;

    #[test]
    fn outputs_drop_incomplete_columns_by_default() {
        let n = solved_network();
        let outputs = get_outputs_df(&n, false).unwrap();
        let names = outputs.column_names();
        assert!(names.contains(&"lines:mu_upper: l1".to_string()));
        assert!(!names.contains(&"lines:mu_upper: l2".to_string()));
        assert!(!names.iter().any(|c| c.starts_with("links:mu_lower: ")));
        assert_eq!(outputs.n_rows(), 3);
        assert!(outputs.columns().all(|(_, v)| v.iter().all(|x| !x.is_nan())));
    }

    #[test]
    fn outputs_keep_everything_on_request() {
        let n = solved_network();
        let outputs = get_outputs_df(&n, true).unwrap();
        // 2+2+2 buses, 2 generators, 1+1+1 storage, 4x2 lines, 4x1 links
        assert_eq!(outputs.width(), 6 + 2 + 3 + 8 + 4);
        assert!(outputs.column("links:mu_lower: k1").unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn filtering_afterwards_equals_default_filter() {
        let n = solved_network();
        let (manual, _) = drop_na_columns(get_outputs_df(&n, true).unwrap());
        let filtered = get_outputs_df(&n, false).unwrap();
        assert_eq!(manual, filtered);
    }

    #[test]
    fn select_outputs_reports_dropped_columns() {
        let n = solved_network();
        let outputs = select_outputs(&n, &SelectionSchema::outputs_v1(), false).unwrap();
        assert_eq!(outputs.dropped, ["lines:mu_upper: l2", "links:mu_lower: k1"]);
    }

    #[test]
    fn inputs_are_never_filtered() {
        let mut n = solved_network();
        n.insert(
            "loads_t",
            "p_set",
            table(&SNAPSHOTS, &[("l1", &[f64::NAN, 1.0, 2.0]), ("l2", &[f64::NAN; 3])]),
        );
        let inputs = get_inputs_df(&n).unwrap();
        assert_eq!(
            inputs.column_names(),
            [
                "loads:p_set: l1",
                "loads:p_set: l2",
                "generators:p_max_pu: g1",
                "generators:p_max_pu: g2",
            ]
        );
        assert_eq!(inputs.n_rows(), 3);
        assert!(inputs.column("loads:p_set: l1").unwrap()[0].is_nan());
    }

    #[test]
    fn nodal_power_is_prefix_subset_of_outputs() {
        let n = solved_network();
        let outputs = get_outputs_df(&n, false).unwrap();
        let power = nodal_power(&outputs);
        let expected: Vec<&String> = outputs
            .column_names()
            .iter()
            .filter(|c| c.starts_with(NODAL_POWER_PREFIX))
            .collect();
        assert_eq!(power.column_names().iter().collect::<Vec<_>>(), expected);
        assert_eq!(power.column_names(), ["buses:p: b1", "buses:p: b2"]);
        for (name, values) in power.columns() {
            assert_eq!(outputs.column(name), Some(values));
        }
    }

    #[test]
    fn inputs_and_outputs_are_disjoint() {
        let idx = ["t1", "t2", "t3"];
        let mut n = Network::new("n", labels(&idx));
        n.insert(
            "generators_t",
            "p",
            table(&idx, &[("g1", &[1.0, 2.0, 3.0]), ("g2", &[4.0, 5.0, 6.0])]),
        );
        n.insert("loads_t", "p_set", table(&idx, &[("l1", &[7.0, 8.0, 9.0])]));

        let inputs = select_inputs(
            &n,
            &SelectionSchema {
                name: "inputs".into(),
                version: 1,
                fields: vec![FieldRef::new("loads_t", "p_set")],
            },
        )
        .unwrap();
        assert_eq!(inputs.shape(), (3, 1));
        assert_eq!(inputs.column_names(), ["loads:p_set: l1"]);

        let outputs = select_outputs(
            &n,
            &SelectionSchema {
                name: "outputs".into(),
                version: 1,
                fields: vec![FieldRef::new("generators_t", "p")],
            },
            false,
        )
        .unwrap();
        assert_eq!(outputs.table.column_names(), ["generators:p: g1", "generators:p: g2"]);
        assert!(inputs
            .column_names()
            .iter()
            .all(|c| !outputs.table.column_names().contains(c)));
    }

    #[test]
    fn missing_component_aborts_outputs() {
        let mut n = Network::new("n", labels(&SNAPSHOTS));
        n.insert("buses_t", "p", table(&SNAPSHOTS, &[("b1", &[1.0, 2.0, 3.0])]));
        let err = get_outputs_df(&n, false).unwrap_err();
        assert_eq!(
            err,
            ExtractError::Lookup(NetworkError::MissingAttribute {
                collection: "buses_t".into(),
                attribute: "v_ang".into(),
            })
        );
    }
}
