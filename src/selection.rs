//! Fixed, versioned lists of the timeseries treated as model inputs and
//! outputs.

use serde::{Deserialize, Serialize};

use crate::data::error::NetworkError;
use crate::data::model::TimeseriesSource;
use crate::extract::SelectionEntry;

/// A `(collection, attribute)` pair naming one timeseries table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub collection: String,
    pub attribute: String,
}

impl FieldRef {
    pub fn new(collection: &str, attribute: &str) -> Self {
        Self {
            collection: collection.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

/// An ordered list of timeseries to extract. The order fixes the column
/// order of the extracted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSchema {
    pub name: String,
    pub version: u32,
    pub fields: Vec<FieldRef>,
}

const OUTPUTS_V1: &[(&str, &str)] = &[
    ("buses_t", "p"),
    ("buses_t", "v_ang"),
    ("buses_t", "marginal_price"),
    ("generators_t", "p"),
    ("storage_units_t", "p"),
    ("storage_units_t", "state_of_charge"),
    ("storage_units_t", "spill"),
    ("lines_t", "p0"),
    ("lines_t", "p1"),
    ("lines_t", "mu_lower"),
    ("lines_t", "mu_upper"),
    ("links_t", "p0"),
    ("links_t", "p1"),
    ("links_t", "mu_lower"),
    ("links_t", "mu_upper"),
];

const INPUTS_V1: &[(&str, &str)] = &[
    ("loads_t", "p_set"),
    ("generators_t", "p_max_pu"),
    ("storage_units_t", "inflow"),
];

impl SelectionSchema {
    fn from_pairs(name: &str, version: u32, pairs: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            version,
            fields: pairs
                .iter()
                .map(|(collection, attribute)| FieldRef::new(collection, attribute))
                .collect(),
        }
    }

    /// Dispatch and result variables: nodal power, voltage angle and price,
    /// generator and storage dispatch, branch flows and their bound
    /// multipliers.
    pub fn outputs_v1() -> Self {
        Self::from_pairs("outputs", 1, OUTPUTS_V1)
    }

    /// Exogenous drivers: load set-points, generator availability and
    /// storage inflow.
    pub fn inputs_v1() -> Self {
        Self::from_pairs("inputs", 1, INPUTS_V1)
    }

    /// Pair every field with the column count it currently has in `source`.
    pub fn resolve<S>(&self, source: &S) -> Result<Vec<SelectionEntry>, NetworkError>
    where
        S: TimeseriesSource + ?Sized,
    {
        self.fields
            .iter()
            .map(|field| {
                let table = source.timeseries(&field.collection, &field.attribute)?;
                Ok(SelectionEntry::new(
                    field.collection.as_str(),
                    field.attribute.as_str(),
                    table.width(),
                ))
            })
            .collect()
    }
}
