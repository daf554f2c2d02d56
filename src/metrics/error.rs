use crate::stats::{LayerOutOfRange, ShapeError};

/// Numeric failures that are surfaced instead of clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DomainError {
    /// `deltaᵀ · VI · delta` came out negative, so it has no square root.
    NegativeQuadraticForm { value: f64 },
    /// Cosine similarity is undefined for a zero-length vector.
    ZeroNorm,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NegativeQuadraticForm { value } => {
                write!(f, "negative quadratic form {value:e} under square root")
            }
            DomainError::ZeroNorm => write!(f, "zero-norm vector in cosine similarity"),
        }
    }
}

impl std::error::Error for DomainError {}

/// Reasons why a sample could not be scored.
#[derive(Clone, Debug, PartialEq)]
pub enum ScoreError {
    /// The class id has no entry in the loaded store.
    UnknownClass { class_id: String },
    /// The sample has more layers than the class statistics.
    LayerOutOfRange(LayerOutOfRange),
    Shape {
        layer: Option<usize>,
        source: ShapeError,
    },
    Domain {
        layer: Option<usize>,
        source: DomainError,
    },
}

impl ScoreError {
    /// Attach the layer position to shape and domain errors.
    pub fn at_layer(self, index: usize) -> Self {
        match self {
            ScoreError::Shape { source, .. } => ScoreError::Shape {
                layer: Some(index),
                source,
            },
            ScoreError::Domain { source, .. } => ScoreError::Domain {
                layer: Some(index),
                source,
            },
            other => other,
        }
    }
}

impl From<ShapeError> for ScoreError {
    fn from(source: ShapeError) -> Self {
        ScoreError::Shape {
            layer: None,
            source,
        }
    }
}

impl From<DomainError> for ScoreError {
    fn from(source: DomainError) -> Self {
        ScoreError::Domain {
            layer: None,
            source,
        }
    }
}

impl From<LayerOutOfRange> for ScoreError {
    fn from(err: LayerOutOfRange) -> Self {
        ScoreError::LayerOutOfRange(err)
    }
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreError::UnknownClass { class_id } => {
                write!(f, "class ID {class_id} not found in reference statistics")
            }
            ScoreError::LayerOutOfRange(err) => write!(f, "{err}"),
            ScoreError::Shape {
                layer: Some(layer),
                source,
            } => write!(f, "layer {layer}: {source}"),
            ScoreError::Shape { layer: None, source } => write!(f, "{source}"),
            ScoreError::Domain {
                layer: Some(layer),
                source,
            } => write!(f, "layer {layer}: {source}"),
            ScoreError::Domain { layer: None, source } => write!(f, "{source}"),
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreError::UnknownClass { .. } => None,
            ScoreError::LayerOutOfRange(err) => Some(err),
            ScoreError::Shape { source, .. } => Some(source),
            ScoreError::Domain { source, .. } => Some(source),
        }
    }
}
