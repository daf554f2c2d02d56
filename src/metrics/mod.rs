//! Distance engine computing anomaly signals against reference statistics.
//!
//! For a class id and an ordered list of per-layer sample vectors it reports
//! - the sum over layers of the Mahalanobis distance between sample and mean,
//!   using the stored inverse covariance;
//! - the sum over layers of the angle (degrees) between sample and mean.
//!
//! Numeric domain problems (negative quadratic forms, zero-norm vectors) are
//! returned as errors; the caller decides on any fallback.

mod engine;
pub mod error;
mod mahalanobis;

pub use engine::DistanceEngine;
pub use error::{DomainError, ScoreError};
pub use mahalanobis::{angle_difference_deg, mahalanobis};
