//! Reference statistics: per-class, per-layer mean vectors and inverse
//! covariance matrices.
//!
//! - [`LayerStatistic`] – one validated `(mean, inverse covariance)` pair.
//! - [`ClassStatistics`] – ordered layers of one class, addressed by position.
//! - [`ReferenceStatisticsStore`] – all classes keyed by class id.
//! - [`SharedStore`] – atomically swappable store snapshot for reloads.

pub mod class;
pub mod layer;
pub mod store;

pub use class::{ClassStatistics, LayerOutOfRange};
pub use layer::{matrix_from_rows, LayerStatistic, ShapeError};
pub use store::{ReferenceStatisticsStore, SharedStore};
