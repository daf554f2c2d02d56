//! Per-layer sample features as produced by the feature-extraction network.
use serde::{Deserialize, Serialize};

/// Layer outputs for one detection crop.
///
/// `layer_outputs[i]` holds the stacked outputs of layer `i`; the first entry
/// is the sample vector scored against layer `i` of the class statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleFeatures {
    pub layer_outputs: Vec<Vec<Vec<f64>>>,
}

impl SampleFeatures {
    pub fn new(layer_outputs: Vec<Vec<Vec<f64>>>) -> Self {
        Self { layer_outputs }
    }

    /// Wrap one sample vector per layer into the stacked shape.
    pub fn from_layer_vectors(vectors: Vec<Vec<f64>>) -> Self {
        Self {
            layer_outputs: vectors.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn has_results(&self) -> bool {
        !self.layer_outputs.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_outputs.len()
    }
}
