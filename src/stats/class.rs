use super::layer::{LayerStatistic, ShapeError};
use nalgebra::{DMatrix, DVector};

/// Requested layer position is past the loaded layers of a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerOutOfRange {
    pub class_id: String,
    pub index: usize,
    pub available: usize,
}

impl std::fmt::Display for LayerOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "layer {} out of range for class {} ({} layers loaded)",
            self.index, self.class_id, self.available
        )
    }
}

impl std::error::Error for LayerOutOfRange {}

/// Ordered per-layer statistics of a single class.
///
/// Layers are addressed by position: entry `i` is compared against the `i`-th
/// layer output of a sample, whatever `layer_index` it was recorded with.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassStatistics {
    pub class_id: String,
    data: Vec<LayerStatistic>,
}

impl ClassStatistics {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            data: Vec::new(),
        }
    }

    /// Append the statistics of the next layer.
    pub fn add(
        &mut self,
        index: usize,
        mean_feat: DVector<f64>,
        inv_cov_feat: DMatrix<f64>,
    ) -> Result<(), ShapeError> {
        let layer = LayerStatistic::new(index, mean_feat, inv_cov_feat)?;
        self.data.push(layer);
        Ok(())
    }

    /// Positional lookup of a layer.
    pub fn get_layer_data(&self, index: usize) -> Result<&LayerStatistic, LayerOutOfRange> {
        self.data.get(index).ok_or_else(|| LayerOutOfRange {
            class_id: self.class_id.clone(),
            index,
            available: self.data.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn layers(&self) -> &[LayerStatistic] {
        &self.data
    }
}
