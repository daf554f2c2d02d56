use super::timing::TimingBreakdown;
use serde::{Deserialize, Serialize};

/// Both anomaly signals for one sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyScore {
    /// Sum of per-layer Mahalanobis distances.
    pub distance: f64,
    /// Sum of per-layer angles in degrees.
    pub angle_deg: f64,
}

/// Contribution of a single layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerScore {
    /// Position in the sample and class sequences.
    pub position: usize,
    /// Index recorded with the class statistics.
    pub layer_index: usize,
    pub dim: usize,
    pub distance: f64,
    pub angle_deg: f64,
}

/// Detailed result of scoring one sample against one class.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub class_id: String,
    pub score: AnomalyScore,
    pub layers: Vec<LayerScore>,
    pub timing: TimingBreakdown,
}

impl ScoreReport {
    /// Layer with the largest distance, if any layer was scored.
    pub fn worst_layer(&self) -> Option<&LayerScore> {
        self.layers
            .iter()
            .max_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
