//! On-disk schema of a per-class statistics file.
use crate::stats::{matrix_from_rows, ClassStatistics, ShapeError};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Contents of `<class_id>_mean_inv_cov.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Informational; the file name decides the class id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub layers: Vec<LayerRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerRecord {
    pub layer_index: usize,
    pub mean_feat: Vec<f64>,
    pub inv_cov_feat: InverseCovariance,
}

/// Inverse covariance as stored: a full row-major matrix, or a bare number
/// standing for a `1×1` matrix.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InverseCovariance {
    Scalar(f64),
    Matrix(Vec<Vec<f64>>),
}

impl InverseCovariance {
    pub fn to_matrix(&self) -> Result<DMatrix<f64>, ShapeError> {
        match self {
            InverseCovariance::Scalar(v) => Ok(DMatrix::from_element(1, 1, *v)),
            InverseCovariance::Matrix(rows) => matrix_from_rows(rows),
        }
    }
}

impl ClassRecord {
    /// Persistable form of loaded statistics, layers in positional order.
    pub fn from_statistics(class: &ClassStatistics) -> Self {
        let layers = class
            .layers()
            .iter()
            .map(|layer| LayerRecord {
                layer_index: layer.layer_index,
                mean_feat: layer.mean_feat.iter().copied().collect(),
                inv_cov_feat: InverseCovariance::Matrix(
                    layer
                        .inv_cov_feat
                        .row_iter()
                        .map(|row| row.iter().copied().collect())
                        .collect(),
                ),
            })
            .collect();
        Self {
            class_id: Some(class.class_id.clone()),
            layers,
        }
    }
}
