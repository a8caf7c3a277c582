//! Pipeline configuration loading for the CLI.

use crate::cli::PresetArg;
use crate::error::{CliError, Result};
use caevo_sieve::PipelineConfig;
use std::fs;
use std::path::Path;

/// Load a pipeline configuration from `path`, or fall back to `preset`.
///
/// Either way the result is validated before it is returned.
pub fn load_pipeline_config(path: Option<&Path>, preset: PresetArg) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            PipelineConfig::from_toml(&contents)
                .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?
        }
        None => preset.into(),
    };

    config.validate().map_err(CliError::Config)?;
    tracing::debug!(sieves = ?config.sieves, mode = %config.mode, "Pipeline configuration loaded");
    Ok(config)
}
