use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wfc_core::{ProgressCallback, WfcConfig};

/// Tunables for a [`crate::LevelGenerator`].
///
/// Every loop that could spin forever on bad input is bounded by one of
/// these limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Path walks tried before giving up, each from a fresh start section.
    pub max_path_attempts: u32,
    /// Direction draws allowed within one path walk.
    pub max_path_steps: u64,
    /// Full restarts of the style pass before giving up.
    pub max_style_attempts: u32,
    /// Iteration cap for each collapse pass; `None` derives one from the grid size.
    pub max_wfc_iterations: Option<u64>,
    /// Directory holding prefabs, corpora and models. `None` uses the built-in set.
    pub data_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_path_attempts: 32,
            max_path_steps: 100_000,
            max_style_attempts: 16,
            max_wfc_iterations: None,
            data_dir: None,
        }
    }
}

impl GeneratorConfig {
    /// Collapse settings for both passes.
    pub fn wfc_config(&self, progress: Option<ProgressCallback>) -> WfcConfig {
        let mut builder = WfcConfig::builder();
        if let Some(max) = self.max_wfc_iterations {
            builder = builder.max_iterations(max);
        }
        if let Some(callback) = progress {
            builder = builder.progress_callback(callback);
        }
        builder.build()
    }
}
