use std::path::{Path, PathBuf};

/// Everything a run needs to know about where it is executing. Passed to the
/// driver explicitly.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Scenario name, used in log lines and derived file names.
    pub scenario: String,
    /// Compute every table but write nothing.
    pub dry_run: bool,
}

impl RunContext {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            dry_run: false,
        }
    }
}

/// Destinations of the three artifacts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub inputs: PathBuf,
    pub outputs: PathBuf,
    pub outputs_p: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<stem>_inputs.<ext>`, `<dir>/<stem>_outputs.<ext>` and
    /// `<dir>/<stem>_outputs_p.<ext>`.
    pub fn in_dir(dir: &Path, stem: &str, ext: &str) -> Self {
        Self {
            inputs: dir.join(format!("{stem}_inputs.{ext}")),
            outputs: dir.join(format!("{stem}_outputs.{ext}")),
            outputs_p: dir.join(format!("{stem}_outputs_p.{ext}")),
        }
    }
}
