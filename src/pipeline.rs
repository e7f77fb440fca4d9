use std::path::Path;

use anyhow::{Context, Result};

use crate::config::ExportConfig;
use crate::context::{OutputPaths, RunContext};
use crate::data::loader::load_network;
use crate::data::model::Network;
use crate::data::writer::{to_record_batch, write_table};
use crate::selectors::{nodal_power, select_inputs, select_outputs};

/// Rows of the outputs table shown in a dry run.
const PREVIEW_ROWS: usize = 5;

/// Shapes of what a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub inputs_shape: (usize, usize),
    pub outputs_shape: (usize, usize),
    pub outputs_p_shape: (usize, usize),
    /// Output columns removed because they held missing values.
    pub dropped_columns: Vec<String>,
}

/// Load the network at `network_path` and produce all three artifacts.
pub fn run(
    ctx: &RunContext,
    config: &ExportConfig,
    network_path: &Path,
    paths: &OutputPaths,
) -> Result<RunSummary> {
    let network = load_network(network_path)
        .with_context(|| format!("loading network {}", network_path.display()))?;
    log::info!(
        "[{}] Loaded network '{}' with {} snapshots",
        ctx.scenario,
        network.name,
        network.snapshots().len()
    );
    for collection in network.collection_names() {
        log::debug!(
            "[{}] {collection}: {:?}",
            ctx.scenario,
            network.attribute_names(collection).collect::<Vec<_>>()
        );
    }
    export(ctx, config, &network, paths)
}

/// Build inputs, outputs and nodal power tables from `network` and write
/// them. Nothing is written unless all three tables were built.
pub fn export(
    ctx: &RunContext,
    config: &ExportConfig,
    network: &Network,
    paths: &OutputPaths,
) -> Result<RunSummary> {
    let inputs = select_inputs(network, &config.inputs_schema()).context("extracting inputs")?;
    let outputs = select_outputs(
        network,
        &config.outputs_schema(),
        config.export_ml.keep_na_columns,
    )
    .context("extracting outputs")?;
    let outputs_p = nodal_power(&outputs.table);

    let summary = RunSummary {
        inputs_shape: inputs.shape(),
        outputs_shape: outputs.table.shape(),
        outputs_p_shape: outputs_p.shape(),
        dropped_columns: outputs.dropped,
    };
    log::info!(
        "[{}] inputs {:?}, outputs {:?} ({} columns dropped), outputs_p {:?}",
        ctx.scenario,
        summary.inputs_shape,
        summary.outputs_shape,
        summary.dropped_columns.len(),
        summary.outputs_p_shape
    );

    if ctx.dry_run {
        let rows = PREVIEW_ROWS.min(outputs.table.n_rows());
        let head = to_record_batch(&outputs.table)?.slice(0, rows);
        let preview = arrow::util::pretty::pretty_format_batches(&[head])
            .context("formatting outputs preview")?;
        log::info!(
            "[{}] Dry run, nothing written. Outputs preview:\n{preview}",
            ctx.scenario
        );
        return Ok(summary);
    }

    write_table(&inputs, &paths.inputs)?;
    write_table(&outputs.table, &paths.outputs)?;
    write_table(&outputs_p, &paths.outputs_p)?;
    log::info!(
        "[{}] Wrote {}, {} and {}",
        ctx.scenario,
        paths.inputs.display(),
        paths.outputs.display(),
        paths.outputs_p.display()
    );

    Ok(summary)
}
