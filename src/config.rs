use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::selection::SelectionSchema;

/// Export settings, read from a JSON workflow config:
///
/// ```json
/// {
///   "export_ml": { "keep_na_columns": false },
///   "schemas": { "outputs": { "name": "outputs", "version": 2, "fields": [...] } }
/// }
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub export_ml: ExportMlOptions,
    pub schemas: SchemaOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportMlOptions {
    /// Keep output columns that contain missing values.
    pub keep_na_columns: bool,
}

/// Replacements for the built-in v1 selection schemas.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaOverrides {
    pub inputs: Option<SelectionSchema>,
    pub outputs: Option<SelectionSchema>,
}

impl ExportConfig {
    /// Read the config at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn inputs_schema(&self) -> SelectionSchema {
        self.schemas
            .inputs
            .clone()
            .unwrap_or_else(SelectionSchema::inputs_v1)
    }

    pub fn outputs_schema(&self) -> SelectionSchema {
        self.schemas
            .outputs
            .clone()
            .unwrap_or_else(SelectionSchema::outputs_v1)
    }
}
