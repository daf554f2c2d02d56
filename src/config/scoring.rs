use crate::handler::ScoringParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the detection records; stdout when absent.
    pub json_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScoringToolConfig {
    /// Directory holding the `<class_id>_mean_inv_cov.json` files.
    pub statistics_dir: PathBuf,
    /// Detections with extracted features for one frame.
    pub input: PathBuf,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<ScoringToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
