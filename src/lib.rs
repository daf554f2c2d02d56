#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod features;
pub mod loader;
pub mod metrics;
pub mod stats;

// Caller-side plumbing used by the tools.
pub mod angle;
pub mod config;
pub mod handler;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Main entry points: statistics, loader and the distance engine.
pub use crate::loader::{LoadError, StatisticsLoader};
pub use crate::metrics::{DistanceEngine, DomainError, ScoreError};
pub use crate::stats::{ClassStatistics, LayerStatistic, ReferenceStatisticsStore, SharedStore};

// Scoring results.
pub use crate::diagnostics::{AnomalyScore, LayerScore, ScoreReport};
pub use crate::features::SampleFeatures;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use feature_anomaly::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = StatisticsLoader::new("stats").load_store()?;
/// let engine = DistanceEngine::new(Arc::new(store));
///
/// let feats = SampleFeatures::from_layer_vectors(vec![vec![0.2, 0.9]]);
/// let score = engine.score("bolt", &feats.layer_outputs)?;
/// println!("distance={:.3} angle={:.3}", score.distance, score.angle_deg);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::features::SampleFeatures;
    pub use crate::{AnomalyScore, DistanceEngine, ReferenceStatisticsStore, StatisticsLoader};
}
