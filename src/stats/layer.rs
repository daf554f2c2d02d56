use nalgebra::{DMatrix, DVector};

/// Reasons why vectors or matrices cannot be combined.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeError {
    /// The inverse covariance is not square.
    NonSquareInverse { rows: usize, cols: usize },
    /// The inverse covariance does not match the mean dimension.
    InverseDimensionMismatch { mean_len: usize, inv_dim: usize },
    /// A matrix row has a different length than the first row.
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The sample vector does not match the reference dimension.
    SampleDimensionMismatch { expected: usize, found: usize },
    /// A layer output carries no stacked sample vector.
    EmptyLayerOutput,
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::NonSquareInverse { rows, cols } => {
                write!(f, "inverse covariance is not square ({rows}x{cols})")
            }
            ShapeError::InverseDimensionMismatch { mean_len, inv_dim } => write!(
                f,
                "inverse covariance is {inv_dim}x{inv_dim} but mean has {mean_len} elements"
            ),
            ShapeError::RaggedMatrix {
                row,
                expected,
                found,
            } => write!(
                f,
                "matrix row {row} has {found} elements, expected {expected}"
            ),
            ShapeError::SampleDimensionMismatch { expected, found } => write!(
                f,
                "sample vector has {found} elements, expected {expected}"
            ),
            ShapeError::EmptyLayerOutput => write!(f, "layer output has no sample vector"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Reference statistics for one layer of one class.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStatistic {
    /// Layer index as recorded by the statistics producer.
    pub layer_index: usize,
    pub mean_feat: DVector<f64>,
    /// Precomputed inverse covariance; never inverted or checked for definiteness here.
    pub inv_cov_feat: DMatrix<f64>,
}

impl LayerStatistic {
    /// Build a layer entry, validating that `inv_cov_feat` is `D×D` for a
    /// mean of length `D`.
    pub fn new(
        layer_index: usize,
        mean_feat: DVector<f64>,
        inv_cov_feat: DMatrix<f64>,
    ) -> Result<Self, ShapeError> {
        let (rows, cols) = inv_cov_feat.shape();
        if rows != cols {
            return Err(ShapeError::NonSquareInverse { rows, cols });
        }
        if rows != mean_feat.len() {
            return Err(ShapeError::InverseDimensionMismatch {
                mean_len: mean_feat.len(),
                inv_dim: rows,
            });
        }
        Ok(Self {
            layer_index,
            mean_feat,
            inv_cov_feat,
        })
    }

    /// Feature dimension of this layer.
    pub fn dim(&self) -> usize {
        self.mean_feat.len()
    }
}

/// Build a dense matrix from row vectors, rejecting ragged input.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, ShapeError> {
    let ncols = rows.first().map_or(0, Vec::len);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != ncols {
            return Err(ShapeError::RaggedMatrix {
                row,
                expected: ncols,
                found: values.len(),
            });
        }
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]))
}
