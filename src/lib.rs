//! Export input and output timeseries tables of a solved energy-system
//! network for ML training.
//!
//! Each network yields three tables: all inputs, all outputs (columns with
//! missing values dropped unless `keep_na_columns` is set), and the nodal
//! power subset of the outputs. Column names follow
//! `"<entity>:<attribute>: <component>"`.

pub mod config;
pub mod context;
pub mod data;
pub mod extract;
pub mod pipeline;
pub mod selection;
pub mod selectors;

pub use data::model::{Network, TimeseriesSource, TimeseriesTable};
pub use extract::{SelectionEntry, column_prefix, extract_values};
pub use selectors::{NODAL_POWER_PREFIX, get_inputs_df, get_outputs_df, nodal_power};
